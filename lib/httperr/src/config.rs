//! Diagnostic configuration types.

use std::sync::Arc;

use crate::{TracingSink, WarningSink};

/// Configuration for broken chain diagnostics.
///
/// There is no process-wide default sink: a configuration built without one
/// reports through [`TracingSink`].
#[derive(Debug, Clone)]
pub struct EnsureConfig {
    /// Where warnings go.
    pub sink: Arc<dyn WarningSink>,
    /// Whether to capture a backtrace with each warning.
    pub capture_stack: bool,
}

impl Default for EnsureConfig {
    fn default() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            capture_stack: false,
        }
    }
}

impl EnsureConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EnsureConfigBuilder {
        EnsureConfigBuilder::default()
    }
}

/// Builder for [`EnsureConfig`].
#[derive(Debug, Clone, Default)]
pub struct EnsureConfigBuilder {
    sink: Option<Arc<dyn WarningSink>>,
    capture_stack: Option<bool>,
}

impl EnsureConfigBuilder {
    /// Set the warning sink.
    #[must_use]
    pub fn sink(self, sink: impl WarningSink + 'static) -> Self {
        self.sink_arc(Arc::new(sink))
    }

    /// Set a shared warning sink.
    #[must_use]
    pub fn sink_arc(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set whether to capture a backtrace with each warning.
    #[must_use]
    pub fn capture_stack(mut self, capture: bool) -> Self {
        self.capture_stack = Some(capture);
        self
    }

    /// Capture a backtrace with each warning.
    #[must_use]
    pub fn with_call_stack(self) -> Self {
        self.capture_stack(true)
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EnsureConfig {
        let defaults = EnsureConfig::default();
        EnsureConfig {
            sink: self.sink.unwrap_or(defaults.sink),
            capture_stack: self.capture_stack.unwrap_or(defaults.capture_stack),
        }
    }
}

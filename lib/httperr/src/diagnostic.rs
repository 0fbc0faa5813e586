//! Broken chain diagnostics.
//!
//! A wrapper that does not expose [`ResponseWriter::unwrap_writer`] hides
//! every error writer installed before it. Requests keep working, error
//! collection silently stops. The helpers here make that visible.

use std::backtrace::Backtrace;
use std::fmt;

use crate::{CapabilitySet, EnsureConfig, ResponseController, ResponseWriter, resolve};

/// Warning emitted when a writer does not resolve to an error writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenChain {
    writer_type: &'static str,
    capabilities: Option<CapabilitySet>,
    stack: Option<String>,
}

impl BrokenChain {
    /// Warning for a writer of type `writer_type`.
    #[must_use]
    pub const fn new(writer_type: &'static str) -> Self {
        Self {
            writer_type,
            capabilities: None,
            stack: None,
        }
    }

    /// Attach the native capabilities of the writer.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Attach a captured call stack.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Type name of the offending writer.
    #[must_use]
    pub const fn writer_type(&self) -> &'static str {
        self.writer_type
    }

    /// Native capabilities of the writer, when known.
    #[must_use]
    pub const fn capabilities(&self) -> Option<CapabilitySet> {
        self.capabilities
    }

    /// Captured call stack, if requested.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl fmt::Display for BrokenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "httperr: response writer `{}` neither collects errors nor wraps a writer that does",
            self.writer_type
        )
    }
}

/// Destination of [`BrokenChain`] warnings.
pub trait WarningSink: fmt::Debug + Send + Sync {
    /// Report `warning`.
    fn warn(&self, warning: &BrokenChain);
}

/// Sink emitting warnings through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &BrokenChain) {
        let capabilities = warning
            .capabilities
            .map_or_else(|| "unknown".to_string(), |set| set.to_string());
        tracing::warn!(
            target: "httperr",
            response_writer_type = warning.writer_type,
            capabilities = %capabilities,
            stack = warning.stack(),
            "{warning}"
        );
    }
}

impl EnsureConfig {
    /// Report a broken chain for `writer_type`.
    pub(crate) fn warn(&self, writer_type: &'static str, capabilities: Option<CapabilitySet>) {
        let mut warning = BrokenChain::new(writer_type);
        if let Some(capabilities) = capabilities {
            warning = warning.with_capabilities(capabilities);
        }
        if self.capture_stack {
            warning = warning.with_stack(Backtrace::force_capture().to_string());
        }
        self.sink.warn(&warning);
    }

    /// Warn when `writer` does not resolve to an error writer.
    ///
    /// Returns whether error collection is supported.
    pub fn check(&self, writer: &mut dyn ResponseWriter) -> bool {
        if resolve(writer).is_some() {
            return true;
        }
        let capabilities = CapabilitySet::probe(writer);
        self.warn(writer.type_name(), Some(capabilities));
        false
    }
}

/// Warn when `ctrl` is not supported, then hand it back.
///
/// Prefer [`EnsureLayer`](crate::middleware::EnsureLayer) when possible.
///
/// ```
/// use httperr::{EnsureConfig, Recorder, ResponseController, ensure_supported};
///
/// let config = EnsureConfig::builder().with_call_stack().build();
/// let mut recorder = Recorder::new();
/// let ctrl = ensure_supported(ResponseController::new(&mut recorder), &config);
/// assert!(!ctrl.is_supported());
/// ```
pub fn ensure_supported<'a>(
    ctrl: ResponseController<'a>,
    config: &EnsureConfig,
) -> ResponseController<'a> {
    if !ctrl.is_supported() {
        config.warn(ctrl.writer_type(), None);
    }
    ctrl
}

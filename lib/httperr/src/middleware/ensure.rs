//! Broken chain detection middleware.

use bytes::Bytes;
use http::Request;
use tower::Layer;

use crate::{EnsureConfig, Handler, Middleware, ResponseWriter};

/// Layer that warns when the incoming writer does not resolve to an error
/// writer.
///
/// Place it last, right before the terminal handler, to check that no
/// wrapper in between lost the unwrap relation. It never changes the request
/// outcome.
#[derive(Debug, Clone, Default)]
pub struct EnsureLayer {
    config: EnsureConfig,
}

impl EnsureLayer {
    /// Create a layer reporting through the default sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer with the given configuration.
    #[must_use]
    pub fn with_config(config: EnsureConfig) -> Self {
        Self { config }
    }
}

impl<H> Layer<H> for EnsureLayer {
    type Service = Ensure<H>;

    fn layer(&self, inner: H) -> Self::Service {
        Ensure {
            inner,
            config: self.config.clone(),
        }
    }
}

impl From<EnsureLayer> for Middleware {
    fn from(layer: EnsureLayer) -> Self {
        Self::from_layer(layer)
    }
}

/// Handler that checks error collection support before delegating.
#[derive(Debug, Clone)]
pub struct Ensure<H> {
    inner: H,
    config: EnsureConfig,
}

impl<H> Ensure<H> {
    /// Create a new check wrapping the given handler, with default settings.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            config: EnsureConfig::default(),
        }
    }
}

impl<H> Handler for Ensure<H>
where
    H: Handler,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        self.config.check(writer);
        self.inner.serve(writer, request);
    }
}

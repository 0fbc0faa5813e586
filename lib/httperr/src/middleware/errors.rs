//! Error collection installer.
//!
//! This middleware makes sure every handler below it can record errors, by
//! wrapping the incoming writer with an [`ErrorsWriter`](crate::ErrorsWriter)
//! unless it already resolves to one.

use bytes::Bytes;
use http::Request;
use tower::Layer;

use crate::{Handler, Middleware, ResponseWriter, with_errors};

/// Layer that installs error collection.
///
/// # Example
///
/// ```
/// use httperr::{ResponseController, handler_fn};
/// use httperr::middleware::ErrorsLayer;
/// use tower::Layer;
///
/// let handler = ErrorsLayer::new().layer(handler_fn(|writer, _request| {
///     let mut ctrl = ResponseController::new(writer);
///     assert!(ctrl.record_error("db timeout").is_some());
/// }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorsLayer {
    _private: (),
}

impl ErrorsLayer {
    /// Create a new installer layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<H> Layer<H> for ErrorsLayer {
    type Service = Errors<H>;

    fn layer(&self, inner: H) -> Self::Service {
        Errors { inner }
    }
}

impl From<ErrorsLayer> for Middleware {
    fn from(layer: ErrorsLayer) -> Self {
        Self::from_layer(layer)
    }
}

/// Handler that installs error collection before delegating.
#[derive(Debug, Clone)]
pub struct Errors<H> {
    inner: H,
}

impl<H> Errors<H> {
    /// Create a new installer wrapping the given handler.
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> Handler for Errors<H>
where
    H: Handler,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        with_errors(writer, |writer| self.inner.serve(writer, request));
    }
}

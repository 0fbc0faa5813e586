//! Request/response logging middleware.
//!
//! This middleware logs requests, responses and the errors handlers recorded,
//! using the `tracing` crate.

use std::fmt;
use std::time::Instant;

use bytes::Bytes;
use http::{Request, StatusCode};
use tower::Layer;
use tracing::{Level, debug, info, span, warn};

use crate::{
    CapabilitySet, Handler, Middleware, ResponseController, ResponseWriter, SharedError,
    StatusCapture,
};

/// Layer that adds request/response logging.
///
/// Errors are read through a [`ResponseController`] once the inner handler
/// returns, so the layer must sit below an
/// [`ErrorsLayer`](crate::middleware::ErrorsLayer) to report them.
///
/// # Example
///
/// ```
/// use httperr::handler_fn;
/// use httperr::middleware::{ErrorsLayer, LoggingLayer};
/// use tower::ServiceBuilder;
///
/// let handler = ServiceBuilder::new()
///     .layer(ErrorsLayer::new())
///     .layer(LoggingLayer::new())
///     .service(handler_fn(|_writer, _request| {}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogLevel {
    /// Log at debug level (request details, writer capabilities).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<H> Layer<H> for LoggingLayer {
    type Service = Logging<H>;

    fn layer(&self, inner: H) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

impl From<LoggingLayer> for Middleware {
    fn from(layer: LoggingLayer) -> Self {
        Self::from_layer(layer)
    }
}

/// Handler that logs requests, responses and recorded errors.
#[derive(Debug, Clone)]
pub struct Logging<H> {
    inner: H,
    level: LogLevel,
}

impl<H> Logging<H> {
    /// Create a new logging handler wrapping the given handler.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

impl<H> Handler for Logging<H>
where
    H: Handler,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        let method = request.method();
        let uri = request.uri();

        let span = span!(Level::INFO, "http_request", %method, %uri);
        let _entered = span.enter();

        let start = Instant::now();

        match self.level {
            LogLevel::Debug => {
                let capabilities = CapabilitySet::probe(writer);
                debug!(
                    headers = ?request.headers(),
                    %capabilities,
                    "request received"
                );
            }
            LogLevel::Info => {
                info!("request received");
            }
        }

        let mut capture = StatusCapture::new(writer);
        self.inner.serve(&mut capture, request);
        let status = capture.status().map_or(0, |status| status.as_u16());
        let written = capture.written();

        // Saturating conversion to u64 (truncates after ~584 million years)
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let ctrl = ResponseController::new(writer);
        match ctrl.errors() {
            Some([]) => {
                info!(status, written, elapsed_ms, "request completed");
            }
            Some(errors) => {
                warn!(
                    status,
                    written,
                    elapsed_ms,
                    error_count = errors.len(),
                    errors = %JoinedErrors(errors),
                    "request completed with errors"
                );
            }
            None => {
                info!(status, written, elapsed_ms, "request completed");
                debug!(
                    response_writer_type = ctrl.writer_type(),
                    "error collection not supported"
                );
            }
        }
    }
}

/// Display recorded errors on one line.
struct JoinedErrors<'a>(&'a [SharedError]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, err) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

//! Metrics middleware using the metrics crate facade.
//!
//! This middleware records request and recorded-error metrics using the
//! `metrics` crate, which allows integration with various metrics backends
//! (Prometheus, `StatsD`, etc.).

use std::time::Instant;

use bytes::Bytes;
use http::{Request, StatusCode};
use tower::Layer;

use crate::{Handler, Middleware, ResponseController, ResponseWriter, StatusCapture};

/// Labels used for metrics.
const LABEL_METHOD: &str = "method";
const LABEL_STATUS: &str = "status";

/// Metric names.
const METRIC_REQUESTS_TOTAL: &str = "http_server_requests_total";
const METRIC_REQUEST_DURATION: &str = "http_server_request_duration_seconds";
const METRIC_RECORDED_ERRORS_TOTAL: &str = "http_server_recorded_errors_total";
const METRIC_RECORDED_ERRORS: &str = "http_server_recorded_errors";

/// Layer that records request metrics.
///
/// Records the following metrics:
/// - `http_server_requests_total` (counter): Total number of requests, labeled by method and status
/// - `http_server_request_duration_seconds` (histogram): Handling duration in seconds
/// - `http_server_recorded_errors_total` (counter): Errors recorded by handlers, labeled by method
/// - `http_server_recorded_errors` (histogram): Errors recorded per request
///
/// Recorded errors are only visible below an
/// [`ErrorsLayer`](crate::middleware::ErrorsLayer).
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer {
    _private: (),
}

impl MetricsLayer {
    /// Create a new metrics layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<H> Layer<H> for MetricsLayer {
    type Service = Metrics<H>;

    fn layer(&self, inner: H) -> Self::Service {
        Metrics { inner }
    }
}

impl From<MetricsLayer> for Middleware {
    fn from(layer: MetricsLayer) -> Self {
        Self::from_layer(layer)
    }
}

/// Handler that records request metrics.
#[derive(Debug, Clone)]
pub struct Metrics<H> {
    inner: H,
}

impl<H> Metrics<H> {
    /// Create a new metrics handler wrapping the given handler.
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> Handler for Metrics<H>
where
    H: Handler,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        let method = request.method().to_string();
        let start = Instant::now();

        let mut capture = StatusCapture::new(writer);
        self.inner.serve(&mut capture, request);
        let status = capture.status().unwrap_or(StatusCode::OK);

        metrics::histogram!(METRIC_REQUEST_DURATION, LABEL_METHOD => method.clone())
            .record(start.elapsed().as_secs_f64());

        metrics::counter!(
            METRIC_REQUESTS_TOTAL,
            LABEL_METHOD => method.clone(),
            LABEL_STATUS => status.as_u16().to_string()
        )
        .increment(1);

        let ctrl = ResponseController::new(writer);
        if let Some(errors) = ctrl.errors() {
            let count = u32::try_from(errors.len()).unwrap_or(u32::MAX);
            metrics::counter!(METRIC_RECORDED_ERRORS_TOTAL, LABEL_METHOD => method)
                .increment(u64::from(count));
            metrics::histogram!(METRIC_RECORDED_ERRORS).record(f64::from(count));
        }
    }
}

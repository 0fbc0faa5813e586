//! Middleware around request handlers.
//!
//! Every layer here implements [`tower::Layer`] for any handler type, so it
//! composes either statically with [`ServiceBuilder`] or dynamically through
//! [`compose`](crate::compose) once converted into a
//! [`Middleware`](crate::Middleware).
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-metrics` | [`MetricsLayer`] |
//!
//! # Available Layers
//!
//! - [`ErrorsLayer`] - Installs error collection for everything below it
//! - [`EnsureLayer`] - Warns when error collection is unreachable
//! - [`LoggingLayer`] - Logs requests, responses and recorded errors using `tracing`
//! - `MetricsLayer` - Records request and recorded-error metrics
//!
//! # Example
//!
//! ```
//! use httperr::{Middleware, ResponseController, compose, handler_fn};
//! use httperr::middleware::{EnsureLayer, ErrorsLayer, LoggingLayer};
//!
//! let handler = compose(
//!     handler_fn(|writer, _request| {
//!         ResponseController::new(writer).record_error("db timeout");
//!     }),
//!     [
//!         Middleware::from(ErrorsLayer::new()),
//!         Middleware::from(LoggingLayer::new()),
//!         Middleware::from(EnsureLayer::new()),
//!     ],
//! );
//! ```

mod ensure;
mod errors;
mod logging;
#[cfg(feature = "middleware-metrics")]
mod metrics;

pub use ensure::{Ensure, EnsureLayer};
pub use errors::{Errors, ErrorsLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
#[cfg(feature = "middleware-metrics")]
pub use metrics::{Metrics, MetricsLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};

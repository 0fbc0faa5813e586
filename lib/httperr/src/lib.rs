//! Collect non-fatal handler errors through any stack of response writer
//! wrappers.
//!
//! A handler that hits a non-fatal error (a failed cache write, a slow
//! upstream) usually still answers the request. This crate lets it record
//! the error on the response writer so an outer middleware can log or count
//! it once the handler returns, however many wrappers sit in between.
//!
//! # Quick Start
//!
//! ```
//! use bytes::Bytes;
//! use http::Request;
//! use httperr::middleware::{ErrorsLayer, LoggingLayer};
//! use httperr::{
//!     Handler, Middleware, Recorder, ResponseController, ResponseWriter, StatusCode, compose,
//!     handler_fn,
//! };
//!
//! let handler = compose(
//!     handler_fn(|writer, _request| {
//!         ResponseController::new(writer).record_error("db timeout");
//!         writer.write_status(StatusCode::INTERNAL_SERVER_ERROR);
//!     }),
//!     [
//!         Middleware::from(ErrorsLayer::new()),
//!         Middleware::from(LoggingLayer::new()),
//!     ],
//! );
//!
//! let mut recorder = Recorder::new();
//! handler.serve(&mut recorder, &Request::new(Bytes::new()));
//! assert_eq!(recorder.status(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```
//!
//! # Writing wrappers
//!
//! A wrapper stays transparent to error collection by returning its inner
//! writer from [`ResponseWriter::unwrap_writer`]. One that does not breaks
//! the chain; [`EnsureLayer`](middleware::EnsureLayer) reports it.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-metrics` | [`MetricsLayer`](middleware::MetricsLayer) using the `metrics` crate |

mod compose;
mod config;
mod diagnostic;
mod handler;
pub mod middleware;
pub mod prelude;
mod service;

pub use compose::{Middleware, compose};
pub use config::{EnsureConfig, EnsureConfigBuilder};
pub use diagnostic::{BrokenChain, TracingSink, WarningSink, ensure_supported};
pub use handler::{BoxHandler, Handler, HandlerFn, handler_fn};
pub use service::HandlerService;

// Re-export core types
pub use httperr_core::{
    BoxError, Capability, CapabilitySet, Connection, Error, ErrorWriter, ErrorsWriter, Flush,
    HeaderMap, Hijack, Hijacked, MAX_UNWRAP_DEPTH, ReadFrom, Recorder, ResponseController,
    ResponseWriter, Result, SharedError, StatusCapture, StatusCode, Variant, WriteString,
    control, header, resolve, resolve_depth, with_errors,
};

// Re-export http and tower for user convenience
pub use http;
pub use tower;

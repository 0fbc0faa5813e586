//! Core types and traits for httperr.
//!
//! This crate provides the building blocks middleware use to share non-fatal
//! errors through any stack of response writer wrappers:
//! - [`ResponseWriter`] - Base writer trait with optional capability probes
//! - [`ErrorWriter`] - Writer that accumulates errors
//! - [`ErrorsWriter`] - Decorator adding an error log to any writer
//! - [`resolve`] - Unwrap chain traversal to the first [`ErrorWriter`]
//! - [`ResponseController`] - Degrade-gracefully view over the error log
//! - [`control`] - Flush and hijack through the unwrap chain
//! - [`Recorder`] - In-memory writer
//! - [`StatusCapture`] - Transparent wrapper observing the status
//! - [`Error`] and [`Result`] - Error handling

mod capture;
pub mod control;
mod controller;
mod decorator;
mod error;
pub mod prelude;
mod recorder;
mod resolve;
mod writer;

pub use capture::StatusCapture;
pub use controller::ResponseController;
pub use decorator::{ErrorsWriter, Variant, with_errors};
pub use error::{BoxError, Error, Result, SharedError};
pub use recorder::Recorder;
pub use resolve::{MAX_UNWRAP_DEPTH, resolve, resolve_depth};
pub use writer::{
    Capability, CapabilitySet, Connection, ErrorWriter, Flush, Hijack, Hijacked, ReadFrom,
    ResponseWriter, WriteString,
};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};

//! Prelude module for convenient imports.
//!
//! ```
//! use httperr::prelude::*;
//! ```

pub use crate::middleware::{EnsureLayer, ErrorsLayer, LoggingLayer};
pub use crate::{
    EnsureConfig, ErrorWriter, ErrorsWriter, Handler, Middleware, Recorder, ResponseController,
    ResponseWriter, SharedError, StatusCode, compose, ensure_supported, handler_fn, with_errors,
};

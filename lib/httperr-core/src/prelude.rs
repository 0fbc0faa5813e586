//! Prelude module for convenient imports.
//!
//! ```ignore
//! use httperr_core::prelude::*;
//! ```

pub use crate::{
    ErrorWriter, ErrorsWriter, Flush, Hijack, ReadFrom, Recorder, ResponseController,
    ResponseWriter, SharedError, StatusCode, WriteString, with_errors,
};

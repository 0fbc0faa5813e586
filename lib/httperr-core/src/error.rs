//! Error types for httperr.
//!
//! Two kinds of errors live here:
//! - [`Error`] is returned by fallible writer operations (flush, hijack, I/O).
//! - [`SharedError`] is what handlers record into the error log. Those values
//!   are never interpreted by this crate.

use std::io;
use std::sync::Arc;

use derive_more::{Display, Error, From};

use crate::Capability;

/// Boxed error accepted when recording a new error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A recorded application error.
///
/// Shared so that recording can hand the very same value back to the caller.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Main error type for response writer operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The writer chain does not provide the requested capability.
    #[display("{_0} is not supported by the response writer")]
    #[from(skip)]
    NotSupported(#[error(not(source))] Capability),

    /// Connection hijacking failed.
    #[display("hijack failed: {_0}")]
    #[from(skip)]
    Hijack(#[error(not(source))] String),

    /// I/O error from the underlying writer.
    #[display("I/O error: {_0}")]
    #[from]
    Io(io::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a not-supported error for the given capability.
    #[must_use]
    pub const fn not_supported(capability: Capability) -> Self {
        Self::NotSupported(capability)
    }

    /// Create a hijack error.
    #[must_use]
    pub fn hijack(message: impl Into<String>) -> Self {
        Self::Hijack(message.into())
    }

    /// Returns `true` if the capability was not found on the writer chain.
    #[must_use]
    pub const fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }

    /// Returns the missing capability, if this is a not-supported error.
    #[must_use]
    pub const fn capability(&self) -> Option<Capability> {
        match self {
            Self::NotSupported(capability) => Some(*capability),
            _ => None,
        }
    }
}

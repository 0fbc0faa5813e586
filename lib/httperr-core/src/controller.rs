//! Controller over the error log reachable from a writer.

use std::fmt;

use crate::{BoxError, ErrorWriter, ResponseWriter, SharedError, resolve};

/// Non-owning view over the [`ErrorWriter`] reachable from a writer handle.
///
/// The unwrap chain is walked once, in [`ResponseController::new`]. Every
/// operation then degrades to `None` / `false` when no error writer was found;
/// nothing here fails or panics.
///
/// # Example
///
/// ```
/// use httperr_core::{ErrorsWriter, Recorder, ResponseController};
///
/// let mut recorder = Recorder::new();
/// assert!(!ResponseController::new(&mut recorder).is_supported());
///
/// let mut writer = ErrorsWriter::new(&mut recorder);
/// let mut ctrl = ResponseController::new(&mut writer);
/// assert!(ctrl.record_error("cache miss").is_some());
/// assert_eq!(ctrl.errors().map(<[_]>::len), Some(1));
/// ```
pub struct ResponseController<'a> {
    writer: Option<&'a mut dyn ErrorWriter>,
    writer_type: &'static str,
}

impl<'a> ResponseController<'a> {
    /// Resolve the error writer reachable from `writer`.
    pub fn new(writer: &'a mut dyn ResponseWriter) -> Self {
        let writer_type = writer.type_name();
        Self {
            writer: resolve(writer),
            writer_type,
        }
    }

    /// Record `err`, returning the recorded value.
    ///
    /// Returns `None` without converting or storing anything when error
    /// collection is not supported.
    pub fn record_error(&mut self, err: impl Into<BoxError>) -> Option<SharedError> {
        let writer = self.writer.as_deref_mut()?;
        Some(writer.record_error(SharedError::from(err.into())))
    }

    /// Record an already shared error.
    pub fn record_shared(&mut self, err: SharedError) -> Option<SharedError> {
        let writer = self.writer.as_deref_mut()?;
        Some(writer.record_error(err))
    }

    /// Errors collected so far, in the order they were recorded.
    #[must_use]
    pub fn errors(&self) -> Option<&[SharedError]> {
        self.writer.as_deref().map(|writer| writer.errors())
    }

    /// Whether an error writer was found.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.writer.is_some()
    }

    /// Type name of the handle this controller was built from.
    #[must_use]
    pub const fn writer_type(&self) -> &'static str {
        self.writer_type
    }
}

impl fmt::Debug for ResponseController<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseController")
            .field("writer_type", &self.writer_type)
            .field("supported", &self.is_supported())
            .field("errors", &self.errors().map(<[_]>::len))
            .finish()
    }
}

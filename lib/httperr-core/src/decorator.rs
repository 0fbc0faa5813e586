//! Error-collecting response writer decorator.

use std::fmt;
use std::io;
use std::sync::Arc;

use http::{HeaderMap, StatusCode};

use crate::{
    ErrorWriter, Flush, Hijack, Hijacked, ReadFrom, ResponseWriter, Result, SharedError,
    WriteString, control, resolve,
};

/// Shape of an [`ErrorsWriter`], fixed when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Forwards writes, flush, hijack and string writes.
    Plain,
    /// Also forwards direct reader copies to the wrapped writer.
    ReadFrom,
}

/// Decorator adding an error log to any [`ResponseWriter`].
///
/// Flush, hijack and string writes are always exposed: they go through
/// [`control`], which reports an error instead of panicking when the wrapped
/// chain cannot do it. Direct reader copy is exposed only when the wrapped
/// writer supports it natively, see [`Variant`].
///
/// # Example
///
/// ```
/// use httperr_core::{ErrorWriter, ErrorsWriter, Recorder, ResponseController};
///
/// let mut recorder = Recorder::new();
/// let mut writer = ErrorsWriter::new(&mut recorder);
///
/// let mut ctrl = ResponseController::new(&mut writer);
/// ctrl.record_error("db timeout");
///
/// assert_eq!(writer.errors().len(), 1);
/// ```
pub struct ErrorsWriter<'a> {
    inner: &'a mut dyn ResponseWriter,
    errors: Vec<SharedError>,
    variant: Variant,
}

impl<'a> ErrorsWriter<'a> {
    /// Wrap `inner` with an empty error log.
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        let variant = if inner.as_reader_from().is_some() {
            Variant::ReadFrom
        } else {
            Variant::Plain
        };
        Self {
            inner,
            errors: Vec::new(),
            variant,
        }
    }

    /// The variant chosen at construction.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Consume the decorator, keeping its log.
    #[must_use]
    pub fn into_errors(self) -> Vec<SharedError> {
        self.errors
    }
}

impl fmt::Debug for ErrorsWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorsWriter")
            .field("inner", &self.inner.type_name())
            .field("errors", &self.errors.len())
            .field("variant", &self.variant)
            .finish()
    }
}

impl ResponseWriter for ErrorsWriter<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.inner.write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }

    fn as_hijacker(&mut self) -> Option<&mut dyn Hijack> {
        Some(self)
    }

    fn as_string_writer(&mut self) -> Option<&mut dyn WriteString> {
        Some(self)
    }

    fn as_reader_from(&mut self) -> Option<&mut dyn ReadFrom> {
        match self.variant {
            Variant::ReadFrom => Some(self),
            Variant::Plain => None,
        }
    }

    fn as_error_writer(&mut self) -> Option<&mut dyn ErrorWriter> {
        Some(self)
    }

    fn unwrap_writer(&mut self) -> Option<&mut dyn ResponseWriter> {
        Some(&mut *self.inner)
    }
}

impl ErrorWriter for ErrorsWriter<'_> {
    fn record_error(&mut self, err: SharedError) -> SharedError {
        self.errors.push(Arc::clone(&err));
        err
    }

    fn errors(&self) -> &[SharedError] {
        &self.errors
    }
}

impl Flush for ErrorsWriter<'_> {
    fn flush(&mut self) -> Result<()> {
        control::flush(&mut *self.inner)
    }
}

impl Hijack for ErrorsWriter<'_> {
    fn hijack(&mut self) -> Result<Hijacked> {
        control::hijack(&mut *self.inner)
    }
}

impl WriteString for ErrorsWriter<'_> {
    fn write_string(&mut self, s: &str) -> io::Result<usize> {
        control::write_string(&mut *self.inner, s)
    }
}

impl ReadFrom for ErrorsWriter<'_> {
    fn read_from(&mut self, reader: &mut dyn io::Read) -> io::Result<u64> {
        control::copy_from(&mut *self.inner, reader)
    }
}

/// Run `f` with a writer that collects errors.
///
/// If `writer` already resolves to an [`ErrorWriter`], `f` receives it as is,
/// so the existing log stays the only one. Otherwise `f` receives a fresh
/// [`ErrorsWriter`] around `writer`, dropped when `f` returns.
pub fn with_errors<R>(
    writer: &mut dyn ResponseWriter,
    f: impl FnOnce(&mut dyn ResponseWriter) -> R,
) -> R {
    if resolve(writer).is_some() {
        return f(writer);
    }
    let mut decorated = ErrorsWriter::new(writer);
    f(&mut decorated)
}

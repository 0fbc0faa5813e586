//! Pass-through writer observing status and body size.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::{Flush, Hijack, Hijacked, ReadFrom, ResponseWriter, Result, WriteString, control};

/// Transparent wrapper recording the status and the number of body bytes.
///
/// It keeps the unwrap relation, so error collection stays reachable through
/// it, and answers each capability probe exactly as the wrapped writer does.
/// Bytes written through [`WriteString`] and [`ReadFrom`] are counted too.
pub struct StatusCapture<'a> {
    inner: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
    written: u64,
}

impl<'a> StatusCapture<'a> {
    /// Wrap `inner`.
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        Self {
            inner,
            status: None,
            written: 0,
        }
    }

    /// Status written through this wrapper, `200 OK` if only the body was.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self.status {
            Some(status) => Some(status),
            None if self.written > 0 => Some(StatusCode::OK),
            None => None,
        }
    }

    /// Body bytes written through this wrapper.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }
}

impl ResponseWriter for StatusCapture<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
        self.inner.write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        if self.inner.as_flusher().is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_hijacker(&mut self) -> Option<&mut dyn Hijack> {
        if self.inner.as_hijacker().is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_string_writer(&mut self) -> Option<&mut dyn WriteString> {
        if self.inner.as_string_writer().is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_reader_from(&mut self) -> Option<&mut dyn ReadFrom> {
        if self.inner.as_reader_from().is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn unwrap_writer(&mut self) -> Option<&mut dyn ResponseWriter> {
        Some(&mut *self.inner)
    }
}

impl Flush for StatusCapture<'_> {
    fn flush(&mut self) -> Result<()> {
        control::flush(&mut *self.inner)?;
        // A flush sends the headers.
        self.status.get_or_insert(StatusCode::OK);
        Ok(())
    }
}

impl Hijack for StatusCapture<'_> {
    fn hijack(&mut self) -> Result<Hijacked> {
        control::hijack(&mut *self.inner)
    }
}

impl WriteString for StatusCapture<'_> {
    fn write_string(&mut self, s: &str) -> io::Result<usize> {
        let n = control::write_string(&mut *self.inner, s)?;
        self.written += n as u64;
        Ok(n)
    }
}

impl ReadFrom for StatusCapture<'_> {
    fn read_from(&mut self, reader: &mut dyn io::Read) -> io::Result<u64> {
        let n = control::copy_from(&mut *self.inner, reader)?;
        self.written += n;
        Ok(n)
    }
}

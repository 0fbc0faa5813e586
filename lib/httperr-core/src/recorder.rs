//! In-memory response writer.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderMap, StatusCode};

use crate::{Flush, ReadFrom, ResponseWriter, Result, WriteString};

/// Response writer that buffers the whole response in memory.
///
/// Natively supports [`Flush`], [`WriteString`] and [`ReadFrom`]; it has no
/// connection to hijack.
///
/// # Example
///
/// ```
/// use httperr_core::{Recorder, ResponseWriter};
/// use http::StatusCode;
///
/// let mut recorder = Recorder::new();
/// recorder.write_status(StatusCode::CREATED);
/// recorder.write(b"done").unwrap();
///
/// let response = recorder.into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// assert_eq!(response.body().as_ref(), b"done");
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
    flushes: usize,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Written status, `200 OK` if none was written.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a status was written, explicitly or by writing the body.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Number of flushes requested.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Consume into an [`http::Response`].
    #[must_use]
    pub fn into_response(self) -> http::Response<Bytes> {
        let status = self.status();
        let mut response = http::Response::new(self.body.freeze());
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for Recorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }

    fn as_string_writer(&mut self) -> Option<&mut dyn WriteString> {
        Some(self)
    }

    fn as_reader_from(&mut self) -> Option<&mut dyn ReadFrom> {
        Some(self)
    }
}

impl Flush for Recorder {
    fn flush(&mut self) -> Result<()> {
        self.status.get_or_insert(StatusCode::OK);
        self.flushes += 1;
        Ok(())
    }
}

impl WriteString for Recorder {
    fn write_string(&mut self, s: &str) -> io::Result<usize> {
        self.write(s.as_bytes())
    }
}

impl ReadFrom for Recorder {
    fn read_from(&mut self, reader: &mut dyn io::Read) -> io::Result<u64> {
        self.status.get_or_insert(StatusCode::OK);
        io::copy(reader, &mut (&mut self.body).writer())
    }
}

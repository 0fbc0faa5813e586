//! Generic capability control.
//!
//! These functions reach an optional capability through the unwrap chain of
//! any writer, reporting [`Error::NotSupported`] when nobody on the chain
//! provides it. They never panic on a writer that lacks the capability.

use std::io;

use crate::{Capability, Error, Hijacked, MAX_UNWRAP_DEPTH, ResponseWriter, Result};

/// Flush buffered response data through the first flusher on the chain.
pub fn flush(writer: &mut dyn ResponseWriter) -> Result<()> {
    let mut current = writer;
    for _ in 0..=MAX_UNWRAP_DEPTH {
        if let Some(flusher) = current.as_flusher() {
            return flusher.flush();
        }
        current = current
            .unwrap_writer()
            .ok_or(Error::NotSupported(Capability::Flush))?;
    }
    Err(Error::NotSupported(Capability::Flush))
}

/// Hijack the connection through the first hijacker on the chain.
pub fn hijack(writer: &mut dyn ResponseWriter) -> Result<Hijacked> {
    let mut current = writer;
    for _ in 0..=MAX_UNWRAP_DEPTH {
        if let Some(hijacker) = current.as_hijacker() {
            return hijacker.hijack();
        }
        current = current
            .unwrap_writer()
            .ok_or(Error::NotSupported(Capability::Hijack))?;
    }
    Err(Error::NotSupported(Capability::Hijack))
}

/// Write `s` natively when `writer` supports it, as bytes otherwise.
pub fn write_string(writer: &mut dyn ResponseWriter, s: &str) -> io::Result<usize> {
    match writer.as_string_writer() {
        Some(string_writer) => string_writer.write_string(s),
        None => writer.write(s.as_bytes()),
    }
}

/// Copy `reader` into the body, natively when `writer` supports it.
pub fn copy_from(writer: &mut dyn ResponseWriter, reader: &mut dyn io::Read) -> io::Result<u64> {
    match writer.as_reader_from() {
        Some(reader_from) => reader_from.read_from(reader),
        None => io::copy(reader, &mut BodyWriter(writer)),
    }
}

/// [`io::Write`] view over a response body.
struct BodyWriter<'a>(&'a mut dyn ResponseWriter);

impl io::Write for BodyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

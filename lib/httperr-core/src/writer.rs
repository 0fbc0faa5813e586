//! Response writer traits.
//!
//! [`ResponseWriter`] is the base abstraction handlers write responses through.
//! Optional capabilities form a small closed set, each behind its own trait:
//!
//! | Capability | Trait | Probe |
//! |------------|-------|-------|
//! | streaming flush | [`Flush`] | [`ResponseWriter::as_flusher`] |
//! | connection hijack | [`Hijack`] | [`ResponseWriter::as_hijacker`] |
//! | raw string write | [`WriteString`] | [`ResponseWriter::as_string_writer`] |
//! | direct reader copy | [`ReadFrom`] | [`ResponseWriter::as_reader_from`] |
//!
//! Wrappers expose the writer they wrap through [`ResponseWriter::unwrap_writer`].
//! Writers that collect errors implement [`ErrorWriter`] and answer
//! [`ResponseWriter::as_error_writer`].

use std::fmt;
use std::io;

use bytes::Bytes;
use derive_more::Display;
use http::{HeaderMap, StatusCode};

use crate::{Result, SharedError};

/// Base response writer.
///
/// Every capability probe defaults to `None`: a writer only claims what it
/// implements natively.
pub trait ResponseWriter {
    /// Response headers, mutable until the status is written.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Write the status line. Only the first call has an effect.
    fn write_status(&mut self, status: StatusCode);

    /// Write body bytes, implying `200 OK` if no status was written yet.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Streaming flush support.
    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        None
    }

    /// Connection hijack support.
    fn as_hijacker(&mut self) -> Option<&mut dyn Hijack> {
        None
    }

    /// Native string write support.
    fn as_string_writer(&mut self) -> Option<&mut dyn WriteString> {
        None
    }

    /// Direct copy from a reader.
    fn as_reader_from(&mut self) -> Option<&mut dyn ReadFrom> {
        None
    }

    /// Error collection support.
    fn as_error_writer(&mut self) -> Option<&mut dyn ErrorWriter> {
        None
    }

    /// The writer this one wraps, if any.
    ///
    /// Wrappers must return the writer they were constructed with, so that
    /// capabilities installed further down stay reachable.
    fn unwrap_writer(&mut self) -> Option<&mut dyn ResponseWriter> {
        None
    }

    /// Name of the concrete writer type, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A writer that accumulates non-fatal errors for the current request.
///
/// Implementors must also answer [`ResponseWriter::unwrap_writer`] with the
/// writer they decorate.
pub trait ErrorWriter: ResponseWriter {
    /// Append `err` to the log and hand it back unchanged.
    fn record_error(&mut self, err: SharedError) -> SharedError;

    /// The current log, in insertion order.
    ///
    /// This is a view on the live log, not a snapshot.
    fn errors(&self) -> &[SharedError];
}

/// Streaming flush.
pub trait Flush {
    /// Send any buffered data to the client.
    fn flush(&mut self) -> Result<()>;
}

/// Connection hijacking.
pub trait Hijack {
    /// Take over the underlying connection.
    ///
    /// After a successful hijack the writer must not be used anymore.
    fn hijack(&mut self) -> Result<Hijacked>;
}

/// Native string write.
pub trait WriteString {
    /// Write `s` without an intermediate byte copy.
    fn write_string(&mut self, s: &str) -> io::Result<usize>;
}

/// Direct copy from a reader into the response body.
pub trait ReadFrom {
    /// Copy `reader` to the body until EOF, returning the number of bytes copied.
    fn read_from(&mut self, reader: &mut dyn io::Read) -> io::Result<u64>;
}

/// A raw bidirectional connection.
pub trait Connection: io::Read + io::Write + Send {}

impl<T> Connection for T where T: io::Read + io::Write + Send {}

/// A connection taken over from a response writer.
pub struct Hijacked {
    /// The raw connection.
    pub conn: Box<dyn Connection>,
    /// Bytes already read from the client but not consumed yet.
    pub buffered: Bytes,
}

impl fmt::Debug for Hijacked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hijacked")
            .field("buffered", &self.buffered.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Capability Set
// ============================================================================

/// One optional writer capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Capability {
    /// Streaming flush.
    #[display("flush")]
    Flush,
    /// Connection hijack.
    #[display("hijack")]
    Hijack,
    /// Native string write.
    #[display("write-string")]
    WriteString,
    /// Direct reader copy.
    #[display("read-from")]
    ReadFrom,
}

impl Capability {
    /// All capabilities, in display order.
    pub const ALL: [Self; 4] = [Self::Flush, Self::Hijack, Self::WriteString, Self::ReadFrom];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The capabilities a writer answers for itself.
///
/// Probing does not walk the unwrap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// An empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Probe the native capabilities of `writer`.
    #[must_use]
    pub fn probe(writer: &mut dyn ResponseWriter) -> Self {
        let mut set = Self::empty();
        if writer.as_flusher().is_some() {
            set = set.with(Capability::Flush);
        }
        if writer.as_hijacker().is_some() {
            set = set.with(Capability::Hijack);
        }
        if writer.as_string_writer().is_some() {
            set = set.with(Capability::WriteString);
        }
        if writer.as_reader_from().is_some() {
            set = set.with(Capability::ReadFrom);
        }
        set
    }

    /// This set plus `capability`.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// Whether `capability` is in the set.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Capabilities in the set.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (index, capability) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{capability}")?;
        }
        Ok(())
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    struct Bare {
        headers: HeaderMap,
    }

    impl ResponseWriter for Bare {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }

        fn write_status(&mut self, _status: StatusCode) {}

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
    }

    #[test]
    fn bare_writer_claims_nothing() {
        let mut writer = Bare {
            headers: HeaderMap::new(),
        };

        check!(CapabilitySet::probe(&mut writer).is_empty());
        check!(writer.as_error_writer().is_none());
        check!(writer.unwrap_writer().is_none());
        check!(writer.type_name().ends_with("Bare"));
    }

    #[test]
    fn capability_set_display() {
        check!(CapabilitySet::empty().to_string() == "none");

        let set: CapabilitySet = [Capability::ReadFrom, Capability::Flush].into_iter().collect();
        check!(set.to_string() == "flush,read-from");
        check!(set.contains(Capability::Flush));
        check!(!set.contains(Capability::Hijack));
    }
}

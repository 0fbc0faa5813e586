//! Unwrap chain traversal.

use crate::{ErrorWriter, ResponseWriter};

/// Maximum number of unwrap steps taken before giving up.
///
/// Well-behaved wrappers never form a cycle, and real middleware stacks are a
/// handful of layers deep. A chain longer than this is treated as broken.
pub const MAX_UNWRAP_DEPTH: usize = 64;

/// Find the first [`ErrorWriter`] on the unwrap chain starting at `writer`.
///
/// `writer` itself is tested first, then each writer returned by
/// [`ResponseWriter::unwrap_writer`]. Returns `None` when the chain ends
/// without an error writer, or when it is longer than [`MAX_UNWRAP_DEPTH`].
pub fn resolve(writer: &mut dyn ResponseWriter) -> Option<&mut dyn ErrorWriter> {
    let mut current = writer;
    for _ in 0..=MAX_UNWRAP_DEPTH {
        if current.as_error_writer().is_some() {
            return current.as_error_writer();
        }
        current = current.unwrap_writer()?;
    }
    None
}

/// Number of unwrap steps from `writer` to the first [`ErrorWriter`].
///
/// `Some(0)` means `writer` collects errors itself.
pub fn resolve_depth(writer: &mut dyn ResponseWriter) -> Option<usize> {
    let mut current = writer;
    for depth in 0..=MAX_UNWRAP_DEPTH {
        if current.as_error_writer().is_some() {
            return Some(depth);
        }
        current = current.unwrap_writer()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use assert2::{check, let_assert};
    use http::{HeaderMap, StatusCode};

    use super::*;
    use crate::{ErrorsWriter, Recorder, SharedError};

    /// Pass-through wrapper that keeps the unwrap relation.
    struct Layered<'a> {
        inner: &'a mut dyn ResponseWriter,
    }

    impl ResponseWriter for Layered<'_> {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            self.inner.headers_mut()
        }

        fn write_status(&mut self, status: StatusCode) {
            self.inner.write_status(status);
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner.write(buf)
        }

        fn unwrap_writer(&mut self) -> Option<&mut dyn ResponseWriter> {
            Some(&mut *self.inner)
        }
    }

    /// Broken wrapper that unwraps to itself.
    struct Looping {
        headers: HeaderMap,
    }

    impl ResponseWriter for Looping {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }

        fn write_status(&mut self, _status: StatusCode) {}

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn unwrap_writer(&mut self) -> Option<&mut dyn ResponseWriter> {
            Some(self)
        }
    }

    fn layered(
        writer: &mut dyn ResponseWriter,
        layers: usize,
        visit: &dyn Fn(&mut dyn ResponseWriter),
    ) {
        if layers == 0 {
            visit(writer);
            return;
        }
        let mut wrapper = Layered { inner: writer };
        layered(&mut wrapper, layers - 1, visit);
    }

    #[test]
    fn resolves_decorator_through_any_number_of_layers() {
        for layers in 0..8 {
            let mut recorder = Recorder::new();
            let mut decorated = ErrorsWriter::new(&mut recorder);
            let marker: SharedError = Arc::new(io::Error::other("marker"));
            decorated.record_error(Arc::clone(&marker));

            layered(&mut decorated, layers, &|outer| {
                check!(resolve_depth(outer) == Some(layers));
                let_assert!(Some(found) = resolve(outer));
                let_assert!([first] = found.errors());
                check!(first.to_string() == "marker");
            });
        }
    }

    #[test]
    fn undecorated_chain_is_not_found() {
        let mut recorder = Recorder::new();
        layered(&mut recorder, 3, &|outer| {
            check!(resolve(outer).is_none());
            check!(resolve_depth(outer).is_none());
        });
    }

    #[test]
    fn cyclic_chain_is_bounded() {
        let mut looping = Looping {
            headers: HeaderMap::new(),
        };
        check!(resolve(&mut looping).is_none());
    }
}

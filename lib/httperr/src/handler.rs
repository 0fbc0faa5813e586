//! Request handlers.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Request;

use crate::ResponseWriter;

/// Type-erased handler for dynamic middleware composition.
pub type BoxHandler = Arc<dyn Handler>;

/// Something that answers a request by writing a response.
///
/// Handlers run to completion on the calling thread; the writer is only
/// borrowed for the duration of [`Handler::serve`].
pub trait Handler: Send + Sync {
    /// Serve `request`, writing the response to `writer`.
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>);

    /// Erase the handler type.
    fn boxed(self) -> BoxHandler
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<H> Handler for Arc<H>
where
    H: Handler + ?Sized,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        (**self).serve(writer, request);
    }
}

impl<H> Handler for Box<H>
where
    H: Handler + ?Sized,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        (**self).serve(writer, request);
    }
}

/// Handler backed by a closure, see [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// Create a [`Handler`] from a closure.
///
/// # Example
///
/// ```
/// use httperr::{ResponseController, ResponseWriter, StatusCode, handler_fn};
///
/// let handler = handler_fn(|writer, _request| {
///     ResponseController::new(writer).record_error("db timeout");
///     writer.write_status(StatusCode::INTERNAL_SERVER_ERROR);
/// });
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync,
{
    fn serve(&self, writer: &mut dyn ResponseWriter, request: &Request<Bytes>) {
        (self.f)(writer, request);
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;
    use crate::{Recorder, StatusCode};

    #[test]
    fn handler_fn_serves() {
        let handler = handler_fn(|writer, request| {
            writer.write_status(StatusCode::NO_CONTENT);
            check!(request.uri() == "/ping");
        });

        let request = Request::builder()
            .uri("/ping")
            .body(Bytes::new())
            .expect("request");
        let mut recorder = Recorder::new();
        handler.boxed().serve(&mut recorder, &request);

        check!(recorder.status() == StatusCode::NO_CONTENT);
    }
}

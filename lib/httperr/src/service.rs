//! Serving handlers as [`tower_service::Service`]s.

use std::convert::Infallible;
use std::fmt;
use std::future::{Ready, ready};
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use tower_service::Service;

use crate::{Handler, Recorder};

/// Adapter running a [`Handler`] against an in-memory [`Recorder`].
///
/// Each call serves the request synchronously and resolves to the recorded
/// response. Useful to drive handlers and middleware from tower-based code
/// and tests.
///
/// # Example
///
/// ```
/// use httperr::{HandlerService, ResponseWriter, StatusCode, handler_fn};
///
/// let service = HandlerService::new(handler_fn(|writer, _request| {
///     writer.write_status(StatusCode::ACCEPTED);
/// }));
/// # drop(service);
/// ```
#[derive(Clone)]
pub struct HandlerService<H> {
    handler: H,
}

impl<H> HandlerService<H> {
    /// Wrap `handler`.
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// The wrapped handler.
    #[must_use]
    pub fn get_ref(&self) -> &H {
        &self.handler
    }

    /// Unwrap the handler.
    #[must_use]
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<H> fmt::Debug for HandlerService<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerService")
            .field("handler", &std::any::type_name::<H>())
            .finish()
    }
}

impl<H> Service<Request<Bytes>> for HandlerService<H>
where
    H: Handler,
{
    type Response = Response<Bytes>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let mut recorder = Recorder::new();
        self.handler.serve(&mut recorder, &request);
        ready(Ok(recorder.into_response()))
    }
}

//! Middleware composition.
//!
//! Middleware is a function from the next handler to a new handler. It can
//! be written as a closure ([`Middleware::from_fn`]) or as a
//! [`tower::Layer`] ([`Middleware::from_layer`]).
//!
//! [`compose`] applies a list of middleware around a terminal handler, the
//! first one listed being the outermost:
//!
//! ```text
//! compose(h, [m1, m2, m3])  ==  m1(m2(m3(h)))
//! request:  m1 → m2 → m3 → h
//! ```
//!
//! The statically typed equivalent is a [`tower::ServiceBuilder`]:
//!
//! ```
//! use httperr::handler_fn;
//! use httperr::middleware::{EnsureLayer, ErrorsLayer, LoggingLayer};
//! use tower::ServiceBuilder;
//!
//! let handler = ServiceBuilder::new()
//!     .layer(ErrorsLayer::new())
//!     .layer(LoggingLayer::new())
//!     .layer(EnsureLayer::new())
//!     .service(handler_fn(|_writer, _request| {}));
//! ```

use std::fmt;
use std::sync::Arc;

use tower::Layer;

use crate::{BoxHandler, Handler};

/// Type-erased middleware.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<dyn Fn(BoxHandler) -> BoxHandler + Send + Sync>,
}

impl Middleware {
    /// Create middleware from a function wrapping the next handler.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
    {
        Self { wrap: Arc::new(f) }
    }

    /// Create middleware from a [`Layer`].
    pub fn from_layer<L>(layer: L) -> Self
    where
        L: Layer<BoxHandler> + Send + Sync + 'static,
        L::Service: Handler + 'static,
    {
        Self::from_fn(move |next| layer.layer(next).boxed())
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

impl Layer<BoxHandler> for Middleware {
    type Service = BoxHandler;

    fn layer(&self, inner: BoxHandler) -> Self::Service {
        (self.wrap)(inner)
    }
}

/// Apply `middleware` around `handler`, first listed outermost.
///
/// Pure composition: nothing is executed until the returned handler serves
/// a request.
pub fn compose<H, I>(handler: H, middleware: I) -> BoxHandler
where
    H: Handler + 'static,
    I: IntoIterator<Item = Middleware>,
    I::IntoIter: DoubleEndedIterator,
{
    middleware
        .into_iter()
        .rev()
        .fold(handler.boxed(), |next, m| m.layer(next))
}

//! Integration tests for error collection through middleware stacks.

#![allow(missing_docs)]

use std::io;
use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use bytes::Bytes;
use http::Request;
use httperr::middleware::{EnsureLayer, ErrorsLayer, LoggingLayer};
use httperr::{
    BrokenChain, EnsureConfig, Handler, HandlerService, HeaderMap, Middleware, Recorder,
    ResponseController, ResponseWriter, StatusCode, WarningSink, compose, handler_fn,
    with_errors,
};
use tower::ServiceExt;

const DB_ERROR: &str = "example db connection error";

/// Wrapper that keeps the unwrap relation.
struct Unwrapping<'a> {
    inner: &'a mut dyn ResponseWriter,
}

impl ResponseWriter for Unwrapping<'_> {
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

/// Wrapper written before error collection existed: no unwrap relation.
struct Legacy<'a> {
    inner: &'a mut dyn ResponseWriter,
}

impl ResponseWriter for Legacy<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.inner.write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
}

#[derive(Debug, Default)]
struct Collect(Mutex<Vec<BrokenChain>>);

impl WarningSink for Collect {
    fn warn(&self, warning: &BrokenChain) {
        self.0.lock().expect("lock").push(warning.clone());
    }
}

/// Shared record of what the test middleware observed.
#[derive(Debug, Default)]
struct Observed {
    logged: Mutex<Vec<String>>,
    unsupported: Mutex<Vec<&'static str>>,
}

impl Observed {
    fn logged(&self) -> Vec<String> {
        self.logged.lock().expect("lock").clone()
    }

    fn unsupported(&self) -> Vec<&'static str> {
        self.unsupported.lock().expect("lock").clone()
    }

    fn report(&self, name: &'static str, ctrl: &ResponseController<'_>) {
        match ctrl.errors() {
            None => self.unsupported.lock().expect("lock").push(name),
            Some([]) => {}
            Some(errors) => {
                let joined = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                self.logged.lock().expect("lock").push(joined);
            }
        }
    }
}

/// Terminal handler recording one error and answering 500.
fn example_500_handler(expect_supported: bool) -> impl Handler + 'static {
    handler_fn(move |writer, _request| {
        let mut ctrl = ResponseController::new(writer);
        check!(ctrl.is_supported() == expect_supported);
        let recorded = ctrl.record_error(io::Error::other(DB_ERROR));
        check!(recorded.is_some() == expect_supported);
        writer.write_status(StatusCode::INTERNAL_SERVER_ERROR);
    })
}

/// Logs the errors recorded below it, relying on an outer installer.
fn logging_middleware(observed: &Arc<Observed>) -> Middleware {
    let observed = Arc::clone(observed);
    Middleware::from_fn(move |next| {
        let observed = Arc::clone(&observed);
        handler_fn(move |writer, request| {
            next.serve(writer, request);
            observed.report("logging", &ResponseController::new(writer));
        })
        .boxed()
    })
}

/// Logs the errors recorded below it, installing collection itself.
fn standalone_logging_middleware(observed: &Arc<Observed>) -> Middleware {
    let observed = Arc::clone(observed);
    Middleware::from_fn(move |next| {
        let observed = Arc::clone(&observed);
        handler_fn(move |writer, request| {
            with_errors(writer, |writer| {
                next.serve(writer, request);
                observed.report("standalone", &ResponseController::new(writer));
            });
        })
        .boxed()
    })
}

fn wrapping_middleware() -> Middleware {
    Middleware::from_fn(|next| {
        handler_fn(move |writer, request| {
            next.serve(&mut Unwrapping { inner: writer }, request);
        })
        .boxed()
    })
}

fn legacy_wrapping_middleware() -> Middleware {
    Middleware::from_fn(|next| {
        handler_fn(move |writer, request| {
            next.serve(&mut Legacy { inner: writer }, request);
        })
        .boxed()
    })
}

fn ensure_middleware(sink: &Arc<Collect>) -> Middleware {
    let config = EnsureConfig::builder()
        .sink_arc(sink.clone())
        .with_call_stack()
        .build();
    Middleware::from(EnsureLayer::with_config(config))
}

fn serve(handler: &dyn Handler) -> Recorder {
    let mut recorder = Recorder::new();
    handler.serve(&mut recorder, &Request::new(Bytes::new()));
    recorder
}

fn warnings(sink: &Collect) -> Vec<BrokenChain> {
    sink.0.lock().expect("lock").clone()
}

#[test]
fn test_log_errors() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(true),
        [
            Middleware::from(ErrorsLayer::new()),
            logging_middleware(&observed),
            ensure_middleware(&sink),
        ],
    );

    let recorder = serve(&*handler);

    check!(recorder.status() == StatusCode::INTERNAL_SERVER_ERROR);
    check!(observed.logged() == [DB_ERROR]);
    check!(observed.unsupported().is_empty());
    check!(warnings(&sink).is_empty());
}

#[test]
fn test_wrapped_response_writer() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(true),
        [
            Middleware::from(ErrorsLayer::new()),
            wrapping_middleware(),
            logging_middleware(&observed),
            ensure_middleware(&sink),
        ],
    );

    let recorder = serve(&*handler);

    check!(recorder.status() == StatusCode::INTERNAL_SERVER_ERROR);
    check!(observed.logged() == [DB_ERROR]);
    check!(warnings(&sink).is_empty());
}

#[test]
fn test_wrapped_response_writer_between() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(true),
        [
            Middleware::from(ErrorsLayer::new()),
            logging_middleware(&observed),
            wrapping_middleware(),
            ensure_middleware(&sink),
        ],
    );

    serve(&*handler);

    check!(observed.logged() == [DB_ERROR]);
    check!(warnings(&sink).is_empty());
}

#[test]
fn test_standalone_logger() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(true),
        [
            standalone_logging_middleware(&observed),
            ensure_middleware(&sink),
        ],
    );

    let recorder = serve(&*handler);

    check!(recorder.status() == StatusCode::INTERNAL_SERVER_ERROR);
    check!(observed.logged() == [DB_ERROR]);
    check!(warnings(&sink).is_empty());
}

#[test]
fn test_standalone_logger_with_default() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(true),
        [
            Middleware::from(ErrorsLayer::new()),
            logging_middleware(&observed),
            wrapping_middleware(),
            standalone_logging_middleware(&observed),
            ensure_middleware(&sink),
        ],
    );

    serve(&*handler);

    // The standalone logger reuses the outer log, so both see the same error.
    check!(observed.logged() == [DB_ERROR, DB_ERROR]);
    check!(warnings(&sink).is_empty());
}

#[test]
fn test_ensure() {
    let sink = Arc::new(Collect::default());
    let handler = compose(example_500_handler(false), [ensure_middleware(&sink)]);

    let recorder = serve(&*handler);

    check!(recorder.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let warnings = warnings(&sink);
    let_assert!([warning] = warnings.as_slice());
    check!(warning.writer_type() == std::any::type_name::<Recorder>());
    check!(warning.stack().is_some());
}

#[test]
fn test_ensure_with_legacy_middleware() {
    let observed = Arc::new(Observed::default());
    let sink = Arc::new(Collect::default());
    let handler = compose(
        example_500_handler(false),
        [
            Middleware::from(ErrorsLayer::new()),
            logging_middleware(&observed),
            legacy_wrapping_middleware(),
            ensure_middleware(&sink),
        ],
    );

    let recorder = serve(&*handler);

    check!(recorder.status() == StatusCode::INTERNAL_SERVER_ERROR);
    // The logger is above the legacy wrapper: collection works, nothing was recorded.
    check!(observed.logged().is_empty());
    check!(observed.unsupported().is_empty());

    let warnings = warnings(&sink);
    let_assert!([warning] = warnings.as_slice());
    check!(warning.writer_type() == std::any::type_name::<Legacy<'_>>());
    let_assert!(Some(capabilities) = warning.capabilities());
    check!(capabilities.is_empty());
}

#[test]
fn test_error_survives_pass_through_wrapper() {
    let mut recorder = Recorder::new();
    let mut decorated = httperr::ErrorsWriter::new(&mut recorder);
    {
        let mut wrapper = Unwrapping {
            inner: &mut decorated,
        };
        let mut ctrl = ResponseController::new(&mut wrapper);
        let_assert!(Some(returned) = ctrl.record_error("db timeout"));
        check!(returned.to_string() == "db timeout");
    }

    let ctrl = ResponseController::new(&mut decorated);
    let_assert!(Some([only]) = ctrl.errors());
    check!(only.to_string() == "db timeout");
}

#[test]
fn test_third_party_writer_is_unsupported() {
    let mut recorder = Recorder::new();
    let mut legacy = Legacy {
        inner: &mut recorder,
    };

    let mut ctrl = ResponseController::new(&mut legacy);
    check!(!ctrl.is_supported());
    check!(ctrl.record_error("lost").is_none());
    check!(ctrl.errors().is_none());
    check!(ctrl.writer_type() == std::any::type_name::<Legacy<'_>>());
}

#[tokio::test]
async fn test_handler_service_with_logging() {
    let handler = compose(
        example_500_handler(true),
        [
            Middleware::from(ErrorsLayer::new()),
            Middleware::from(LoggingLayer::debug()),
        ],
    );

    let response = HandlerService::new(handler)
        .oneshot(Request::new(Bytes::new()))
        .await
        .expect("infallible");

    check!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    check!(response.body().is_empty());
}

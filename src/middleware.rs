//! Request logging middleware.
//!
//! [`RequestLogLayer`] wraps any `tower` service over `http` types. For
//! each request it times the inner service, wraps the response body in a
//! [`CaptureBody`] and writes one line:
//!
//! ```text
//! GET /orders?page=2 [503] (12.408ms)
//! ```
//!
//! Status codes from 500 up go to the info channel and are always printed;
//! everything else goes to the debug channel and only shows up in debug
//! mode. Paths matching the blacklist are never logged.

use http::{Method, Request, Response, Uri};
use pin_project_lite::pin_project;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};
use std::task::{Context, Poll, ready};
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::trace;

use crate::capture::CaptureBody;
use crate::error::Result;
use crate::global::default_logger;
use crate::logger::Logger;

/// Pattern used by [`RequestLogLayer::default_blacklist`].
pub const DEFAULT_BLACKLIST: &str = "/ping|/healthz";

static DEFAULT_BLACKLIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_BLACKLIST).expect("default blacklist is a valid regex"));

/// Which logger receives request lines.
#[derive(Clone, Debug, Default)]
pub enum LoggerSource {
    /// The process-wide default logger, looked up on every request.
    #[default]
    Default,
    Instance(Arc<Logger>),
}

impl LoggerSource {
    /// A dedicated logger with the given name, honoring the environment.
    pub fn named(name: &str) -> Self {
        LoggerSource::Instance(Arc::new(Logger::new(name, true)))
    }

    fn resolve(&self) -> Arc<Logger> {
        match self {
            LoggerSource::Default => default_logger(),
            LoggerSource::Instance(logger) => logger.clone(),
        }
    }
}

impl From<Arc<Logger>> for LoggerSource {
    fn from(logger: Arc<Logger>) -> Self {
        LoggerSource::Instance(logger)
    }
}

impl From<Logger> for LoggerSource {
    fn from(logger: Logger) -> Self {
        LoggerSource::Instance(Arc::new(logger))
    }
}

/// Layer that logs every request passing through it.
#[derive(Clone, Debug, Default)]
pub struct RequestLogLayer {
    logger: LoggerSource,
    blacklist: Option<Regex>,
}

impl RequestLogLayer {
    /// Logs through the default logger, with no blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logger(mut self, logger: impl Into<LoggerSource>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Logs through a new logger called `name`.
    pub fn named(self, name: &str) -> Self {
        self.logger(LoggerSource::named(name))
    }

    /// Skips requests whose path matches `pattern` anywhere.
    pub fn blacklist(mut self, pattern: Regex) -> Self {
        self.blacklist = Some(pattern);
        self
    }

    pub fn blacklist_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.blacklist(Regex::new(pattern)?))
    }

    /// Skips the usual health check endpoints, `/ping` and `/healthz`.
    pub fn default_blacklist(self) -> Self {
        self.blacklist(DEFAULT_BLACKLIST_RE.clone())
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog {
            inner,
            logger: self.logger.clone(),
            blacklist: self.blacklist.clone(),
        }
    }
}

/// Wraps `service` directly. `None` selects the default logger and logs
/// every path.
pub fn http_handler<S>(
    service: S,
    logger: Option<Arc<Logger>>,
    blacklist: Option<Regex>,
) -> RequestLog<S> {
    RequestLog {
        inner: service,
        logger: logger.map(LoggerSource::Instance).unwrap_or_default(),
        blacklist,
    }
}

/// Service produced by [`RequestLogLayer`].
#[derive(Clone, Debug)]
pub struct RequestLog<S> {
    inner: S,
    logger: LoggerSource,
    blacklist: Option<Regex>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<CaptureBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = request.method().clone();
        let uri = request.uri().clone();
        ResponseFuture {
            inner: self.inner.call(request),
            start,
            method,
            uri,
            logger: self.logger.clone(),
            blacklist: self.blacklist.clone(),
        }
    }
}

pin_project! {
    /// Response future of [`RequestLog`].
    pub struct ResponseFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: Method,
        uri: Uri,
        logger: LoggerSource,
        blacklist: Option<Regex>,
    }
}

impl<F, ResBody, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<CaptureBody<ResBody>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let response = ready!(this.inner.poll(cx))?;
        let elapsed = this.start.elapsed();

        let (parts, body) = response.into_parts();
        let body = CaptureBody::with_status(body, parts.status);
        let status = body.capture().status();

        let path = this.uri.path();
        if let Some(blacklist) = this.blacklist
            && blacklist.is_match(path)
        {
            trace!(path, "request excluded from logging");
            return Poll::Ready(Ok(Response::from_parts(parts, body)));
        }

        let target = this
            .uri
            .path_and_query()
            .map_or(path, |path_and_query| path_and_query.as_str());
        let method = &*this.method;
        let code = status.as_u16();
        let elapsed = format_elapsed(elapsed);
        let logger = this.logger.resolve();
        if code >= 500 {
            logger.infof(format_args!("{method} {target} [{code}] ({elapsed})"));
        } else {
            logger.debugf(format_args!("{method} {target} [{code}] ({elapsed})"));
        }

        Poll::Ready(Ok(Response::from_parts(parts, body)))
    }
}

/// Renders request latency: `1.5s` from one second up (millisecond
/// precision), `2.345ms` from one millisecond up, `512µs` or `850ns` below.
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed >= Duration::from_secs(1) {
        let truncated = Duration::new(elapsed.as_secs(), elapsed.subsec_millis() * 1_000_000);
        format!("{truncated:?}")
    } else if elapsed >= Duration::from_millis(1) {
        format!("{:.3}ms", elapsed.as_secs_f64() * 1_000.0)
    } else {
        format!("{elapsed:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::{BodyExt, Empty, Full};
    use std::convert::Infallible;
    use tower::{ServiceExt, service_fn};

    use crate::global::set_default;
    use crate::test_support::{Captured, DEFAULT_LOCK};

    fn logger(debug: bool) -> (Arc<Logger>, Captured) {
        let captured = Captured::default();
        let logger = Logger::with_debug("http", debug).with_writer(captured.clone());
        (Arc::new(logger), captured)
    }

    async fn serve(layer: RequestLogLayer, uri: &str, status: StatusCode) -> Response<CaptureBody<Full<Bytes>>> {
        let service = layer.layer(service_fn(move |_request: Request<Empty<Bytes>>| async move {
            let response = Response::builder()
                .status(status)
                .body(Full::new(Bytes::from("body")))
                .expect("response");
            Ok::<_, Infallible>(response)
        }));
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Empty::new())
            .expect("request");
        service.oneshot(request).await.expect("infallible")
    }

    #[tokio::test]
    async fn server_errors_are_logged_on_info() {
        let (logger, captured) = logger(false);
        let layer = RequestLogLayer::new().logger(logger);
        serve(layer, "/orders?page=2", StatusCode::SERVICE_UNAVAILABLE).await;

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("POST /orders?page=2 [503] ("), "{}", lines[0]);
        assert!(!lines[0].contains("NFO"));
    }

    #[tokio::test]
    async fn codes_above_599_are_logged_on_info() {
        let (logger, captured) = logger(false);
        let status = StatusCode::from_u16(600).expect("valid status");
        serve(RequestLogLayer::new().logger(logger), "/odd", status).await;

        let lines = captured.lines();
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("POST /odd [600] ("), "{}", lines[0]);
    }

    #[tokio::test]
    async fn success_is_hidden_without_debug() {
        let (logger, captured) = logger(false);
        serve(RequestLogLayer::new().logger(logger), "/orders", StatusCode::OK).await;
        assert!(captured.contents().is_empty());
    }

    #[tokio::test]
    async fn success_is_logged_on_debug_in_debug_mode() {
        let (logger, captured) = logger(true);
        serve(RequestLogLayer::new().logger(logger), "/orders", StatusCode::NOT_FOUND).await;
        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("  |  DBG  |  http  "), "{}", lines[0]);
        assert!(lines[0].contains("POST /orders [404] ("));
    }

    #[tokio::test]
    async fn blacklisted_paths_are_skipped() {
        let (logger, captured) = logger(true);
        let layer = RequestLogLayer::new().logger(logger).default_blacklist();
        serve(layer.clone(), "/ping", StatusCode::SERVICE_UNAVAILABLE).await;
        serve(layer.clone(), "/api/healthz?verbose=1", StatusCode::OK).await;
        assert!(captured.contents().is_empty());

        serve(layer, "/status", StatusCode::OK).await;
        assert_eq!(captured.lines().len(), 1);
    }

    #[tokio::test]
    async fn custom_blacklist_pattern() {
        let (logger, captured) = logger(true);
        let layer = RequestLogLayer::new()
            .logger(logger)
            .blacklist_pattern("^/assets/")
            .expect("valid pattern");
        serve(layer.clone(), "/assets/app.js", StatusCode::OK).await;
        serve(layer, "/static/assets/app.js", StatusCode::OK).await;
        assert_eq!(captured.lines().len(), 1);
    }

    #[test]
    fn invalid_blacklist_pattern_is_rejected() {
        let result = RequestLogLayer::new().blacklist_pattern("(unclosed");
        assert!(matches!(result, Err(crate::Error::InvalidBlacklist(_))));
    }

    #[tokio::test]
    async fn response_passes_through_with_capture() {
        let (logger, _captured) = logger(false);
        let response = serve(RequestLogLayer::new().logger(logger), "/", StatusCode::CREATED).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().capture().status(), StatusCode::CREATED);

        let mut body = response.into_body();
        while let Some(frame) = body.frame().await {
            frame.expect("infallible");
        }
        assert_eq!(body.capture().last_chunk(), Some(&Bytes::from("body")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn http_handler_uses_the_default_logger() {
        let captured = Captured::default();
        let service = service_fn(|_request: Request<Empty<Bytes>>| async {
            let response = Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::new()))
                .expect("response");
            Ok::<_, Infallible>(response)
        });
        let service = http_handler(service, None, None);
        let request = Request::builder().uri("/boom").body(Empty::new()).expect("request");

        {
            let _guard = DEFAULT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            set_default(Logger::with_debug("main", false).with_writer(captured.clone()));
            tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current()
                    .block_on(service.oneshot(request))
                    .expect("infallible")
            });
        }

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("main    |  GET /boom [500] ("), "{}", lines[0]);
    }

    #[test]
    fn named_logger_source() {
        let layer = RequestLogLayer::new().named("gateway-edge");
        match layer.logger {
            LoggerSource::Instance(logger) => assert_eq!(logger.name(), "gatewa"),
            LoggerSource::Default => panic!("expected a dedicated logger"),
        }
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_elapsed(Duration::from_micros(1_234_567)), "1.234s");
        assert_eq!(format_elapsed(Duration::from_secs(2)), "2s");
        assert_eq!(format_elapsed(Duration::from_micros(2345)), "2.345ms");
        assert_eq!(format_elapsed(Duration::from_millis(1)), "1.000ms");
        assert_eq!(format_elapsed(Duration::from_micros(512)), "512µs");
        assert_eq!(format_elapsed(Duration::from_nanos(850)), "850ns");
    }
}

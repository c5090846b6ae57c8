//! Request logging middleware.
//!
//! # Responsibilities
//! - Start a request context (trace ID, timer) before the handler runs
//! - Buffer request and response bodies within the capture limit
//! - Emit one request record per non-skipped request
//! - Set `X-Request-Id` on every response, keeping an upstream value
//!
//! # Design Decisions
//! - Skipped routes are never buffered
//! - Bodies are read up to `max_body_bytes`; past that, the read prefix is
//!   chained back in front of the rest and an omission marker is logged
//! - Read errors are logged as a marker and handed on unchanged
//! - Logging failures are reported as diagnostics; the response always goes out

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    Router,
};
use futures_util::{future, stream, Stream, StreamExt};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::schema::InstrumentationConfig;
use crate::http::capture::{
    header_exclusions, request_payload, response_payload, Payload, RequestSnapshot,
};
use crate::http::context::RequestContext;
use crate::http::skip::SkipList;
use crate::logger::registry::LoggerRegistry;
use crate::observability::metrics;

/// Response header carrying the trace ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Shared, read-only state of the request logging middleware.
#[derive(Debug)]
pub struct RequestLogging {
    registry: Arc<LoggerRegistry>,
    skip: SkipList,
    excluded_headers: HashSet<String>,
    max_body_bytes: usize,
}

impl RequestLogging {
    pub fn new(
        registry: Arc<LoggerRegistry>,
        config: &InstrumentationConfig,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            registry,
            skip: SkipList::new(config.skip_routes.iter().cloned(), &config.skip_regexes)?,
            excluded_headers: header_exclusions(&config.env_headers),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Wrap every route of `router` with request logging.
    pub fn install<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum::middleware::from_fn_with_state(
            Arc::new(self),
            request_logging_middleware,
        ))
    }

    /// Read `body` up to the capture limit.
    ///
    /// The returned body always replays exactly what the original would
    /// have produced, including a read error, so downstream sees the same
    /// stream whether or not it was captured.
    async fn buffer(&self, body: Body) -> (Body, Captured) {
        let limit = self.max_body_bytes;
        let announced = body.size_hint().lower();
        if announced > limit as u64 {
            let marker = format!("<body omitted: {} bytes exceeds {} byte limit>", announced, limit);
            return (body, Captured::Omitted(marker));
        }

        let mut frames = body.into_data_stream();
        let mut chunks = Vec::new();
        let mut read = 0usize;
        while let Some(next) = frames.next().await {
            match next {
                Ok(chunk) => {
                    read += chunk.len();
                    chunks.push(chunk);
                    if read > limit {
                        let marker = format!("<body omitted: exceeds {} byte limit>", limit);
                        return (replay(chunks, frames), Captured::Omitted(marker));
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read body for request log");
                    let marker = format!("<body unreadable: {}>", e);
                    let failed = stream::once(future::ready(Err(e)));
                    return (replay(chunks, failed), Captured::Omitted(marker));
                }
            }
        }

        let bytes = concat(&chunks);
        (Body::from(bytes.clone()), Captured::Complete(bytes))
    }

    async fn capture_request(&self, req: Request) -> (Request, RequestSnapshot) {
        let (parts, body) = req.into_parts();
        let (body, captured) = self.buffer(body).await;

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let payload = match captured {
            Captured::Complete(bytes) => request_payload(&bytes, content_type).await,
            Captured::Omitted(marker) => Payload::Omitted(marker),
        };
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let snapshot = RequestSnapshot::capture(
            &parts.method,
            &parts.uri,
            &parts.headers,
            peer,
            &payload,
            &self.excluded_headers,
        );
        (Request::from_parts(parts, body), snapshot)
    }

    async fn log_exchange(
        &self,
        ctx: &RequestContext,
        snapshot: RequestSnapshot,
        response: Response,
    ) -> Response {
        let duration = ctx.elapsed_secs();
        let (parts, body) = response.into_parts();
        let (body, captured) = self.buffer(body).await;
        let resp = match captured {
            Captured::Complete(bytes) => response_payload(&bytes),
            Captured::Omitted(marker) => Payload::Omitted(marker),
        };

        let extra = snapshot.into_req_extra(ctx, duration, &resp);
        if let Err(e) = self.registry.req().info("", &extra) {
            tracing::warn!(trace_id = %ctx.trace_id, error = %e, "Failed to emit request log");
        }
        metrics::record_request_duration(duration);

        Response::from_parts(parts, body)
    }
}

/// Outcome of reading a body for the request record.
#[derive(Debug, PartialEq)]
enum Captured {
    Complete(Bytes),
    /// Not captured; the marker is logged instead.
    Omitted(String),
}

/// Body yielding the chunks already read, then whatever `rest` yields.
fn replay<S>(read: Vec<Bytes>, rest: S) -> Body
where
    S: Stream<Item = Result<Bytes, axum::Error>> + Send + 'static,
{
    Body::from_stream(stream::iter(read.into_iter().map(Ok::<_, axum::Error>)).chain(rest))
}

fn concat(chunks: &[Bytes]) -> Bytes {
    if let [only] = chunks {
        return only.clone();
    }
    let mut buf = Vec::with_capacity(chunks.iter().map(Bytes::len).sum());
    for chunk in chunks {
        buf.extend_from_slice(chunk);
    }
    Bytes::from(buf)
}

/// Set the trace header unless the response already carries one.
pub fn set_trace_header(response: &mut Response, trace_id: &str) {
    match HeaderValue::from_str(trace_id) {
        Ok(value) => {
            response.headers_mut().entry(X_REQUEST_ID).or_insert(value);
        }
        Err(e) => tracing::warn!(trace_id = %trace_id, error = %e, "Trace ID is not a valid header value"),
    }
}

/// Axum middleware: use with `from_fn_with_state(Arc<RequestLogging>, ...)`
/// or [`RequestLogging::install`].
pub async fn request_logging_middleware(
    State(logging): State<Arc<RequestLogging>>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::begin();
    req.extensions_mut().insert(ctx.clone());

    let mut response = if logging.skip.should_skip(req.uri().path()) {
        metrics::record_request_skipped();
        next.run(req).await
    } else {
        let (req, snapshot) = logging.capture_request(req).await;
        let response = next.run(req).await;
        logging.log_exchange(&ctx, snapshot, response).await
    };

    set_trace_header(&mut response, &ctx.trace_id);
    response
}

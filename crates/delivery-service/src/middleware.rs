//! HTTP middleware for the delivery service.
//!
//! - [`RequestId`]: correlation ID newtype
//! - [`extract_or_generate_request_id`]: read `X-Request-ID` or mint a UUID v7
//! - [`MetricsLayer`]: Tower layer recording HTTP metrics and echoing the request ID
//!
//! The layer records `http_requests_total`, `http_request_duration_seconds`,
//! `http_request_size_bytes` and `http_response_size_bytes`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new time-sortable UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Missing, empty, or non-UTF-8 headers yield a fresh ID.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Normalize a request path for metric labels.
///
/// Drops the query string and collapses numeric segments (map ids) to `{id}`
/// so that label cardinality stays bounded.
pub fn normalize_path(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    if path == "/" {
        return path.to_string();
    }
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn content_length(headers: &HeaderMap) -> Option<f64> {
    headers
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
}

/// Write the correlation ID into a header map, replacing any previous value.
fn stamp_request_id(headers: &mut HeaderMap, request_id: &RequestId) {
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// Metric labels shared by every HTTP series of one request.
#[derive(Debug, Clone)]
struct RouteLabels {
    method: String,
    path: String,
}

impl RouteLabels {
    fn of<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().to_string(),
            path: normalize_path(req.uri().path()),
        }
    }

    fn record_size(&self, series: &'static str, headers: &HeaderMap) {
        if let Some(size) = content_length(headers) {
            metrics::histogram!(
                series,
                "method" => self.method.clone(),
                "path" => self.path.clone()
            )
            .record(size);
        }
    }

    fn record_outcome(&self, bucket: &'static str, elapsed: Duration) {
        metrics::counter!(
            "http_requests_total",
            "method" => self.method.clone(),
            "path" => self.path.clone(),
            "status" => bucket
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => self.method.clone(),
            "path" => self.path.clone()
        )
        .record(elapsed.as_secs_f64());
    }
}

/// Tower layer for recording HTTP metrics and propagating request IDs.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let labels = RouteLabels::of(&req);
        labels.record_size("http_request_size_bytes", req.headers());

        // Handlers read the ID back from the request headers.
        let request_id = extract_or_generate_request_id(req.headers());
        stamp_request_id(req.headers_mut(), &request_id);

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %labels.method,
            path = %labels.path,
        );
        span.in_scope(|| tracing::info!("handling request"));

        MetricsFuture {
            inner: self.inner.call(req),
            start,
            labels,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics and stamps the request ID on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        labels: RouteLabels,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let Poll::Ready(mut result) = this.inner.poll(cx) else {
            return Poll::Pending;
        };

        let elapsed = this.start.elapsed();
        let latency_ms = elapsed.as_secs_f64() * 1000.0;

        match &mut result {
            Ok(response) => {
                let status = response.status().as_u16();
                this.labels.record_outcome(status_bucket(status), elapsed);
                this.labels
                    .record_size("http_response_size_bytes", response.headers());
                stamp_request_id(response.headers_mut(), this.request_id);
                tracing::info!(status, latency_ms, "request completed");
            }
            Err(_) => {
                this.labels.record_outcome("5xx", elapsed);
                tracing::error!(latency_ms, "request failed");
            }
        }

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("delivery-123"));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str(), "delivery-123");
    }

    #[test]
    fn test_extract_request_id_generates_when_blank() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("   "));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str().len(), 36);

        let id = extract_or_generate_request_id(&HeaderMap::new());
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/maps"), "/maps");
        assert_eq!(normalize_path("/maps/42"), "/maps/{id}");
        assert_eq!(normalize_path("/maps/estimate_delivery?x=1"), "/maps/estimate_delivery");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_stamp_request_id_replaces_existing_value() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("stale"));

        stamp_request_id(&mut headers, &RequestId::new("req-42"));
        assert_eq!(headers.get(REQUEST_ID_HEADER).unwrap(), "req-42");
        assert_eq!(headers.get_all(REQUEST_ID_HEADER).iter().count(), 1);
    }

    #[test]
    fn test_route_labels_use_normalized_path() {
        let req = Request::post("/maps/17?verbose=1").body(()).unwrap();
        let labels = RouteLabels::of(&req);
        assert_eq!(labels.method, "POST");
        assert_eq!(labels.path, "/maps/{id}");

        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        assert_eq!(content_length(&headers), Some(12.0));
        labels.record_size("http_request_size_bytes", &headers);
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(201), "2xx");
        assert_eq!(status_bucket(301), "3xx");
        assert_eq!(status_bucket(422), "4xx");
        assert_eq!(status_bucket(503), "5xx");
        assert_eq!(status_bucket(99), "other");
    }
}

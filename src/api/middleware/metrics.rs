use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Incoming `x-request-id`, or a fresh one.
fn get_request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Probes are polled constantly and would drown the request log.
fn is_probe(path: &str) -> bool {
    path == "/health" || path.starts_with("/health/")
}

/// Per-request log line and `x-request-id` propagation.
///
/// Only the path is logged; query strings carry filter values of arbitrary
/// size. Socket upgrades are logged when the upgrade response is sent, not
/// when the socket closes.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let has_query = request.uri().query().is_some();
    let request_id = get_request_id(request.headers());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID.clone(), value);
    }

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(%request_id, %method, %path, status = status.as_u16(), duration_ms, "request_failed");
    } else if status == StatusCode::SWITCHING_PROTOCOLS {
        info!(%request_id, %path, "socket_upgraded");
    } else if is_probe(&path) {
        debug!(%request_id, %path, status = status.as_u16(), duration_ms, "probe_completed");
    } else {
        info!(%request_id, %method, %path, has_query, status = status.as_u16(), duration_ms, "request_completed");
    }

    response
}

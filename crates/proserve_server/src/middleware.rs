//! Request logging.
//!
//! Every request gets a fresh `x-request-id`. Only method, path, status and
//! timing are logged; bodies never are.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let http_status = response.status();
    let duration_ms = started.elapsed().as_millis();
    if http_status.is_server_error() {
        warn!(
            "event=http_request module=server status=error request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=server status=ok request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

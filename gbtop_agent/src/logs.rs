//! Request log: middleware that records every API request into the ring the
//! `/api/v1/logs` endpoint serves.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::metrics::round2;
use crate::state::AppState;
use crate::types::LogRecord;

/// Requests to this path are served but not recorded, so polling the log
/// doesn't fill it.
pub const LOGS_ROUTE: &str = "/api/v1/logs";

pub fn level_for(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "ERROR"
    } else if status.is_client_error() {
        "WARNING"
    } else {
        "INFO"
    }
}

pub async fn record_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = state.next_request_id();

    let mut resp = next.run(req).await;
    resp.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let status = resp.status();
    let duration_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
    debug!(%method, %path, status = status.as_u16(), duration_ms, %request_id, "request");

    if path != LOGS_ROUTE {
        state
            .push_log(LogRecord {
                ts: Utc::now().to_rfc3339(),
                level: level_for(status).to_string(),
                message: method,
                path,
                status_code: status.as_u16(),
                duration_ms,
                request_id,
            })
            .await;
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_status_class() {
        assert_eq!(level_for(StatusCode::OK), "INFO");
        assert_eq!(level_for(StatusCode::NOT_FOUND), "WARNING");
        assert_eq!(level_for(StatusCode::SERVICE_UNAVAILABLE), "ERROR");
    }
}

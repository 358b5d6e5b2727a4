//! Liveness endpoint

use crate::http;
use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "OK",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// `GET /api/health`
pub fn health() -> Response<Full<Bytes>> {
    http::json_response(StatusCode::OK, &HealthResponse::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_health_timestamp_is_valid_rfc3339() {
        let before = Utc::now();
        let health = HealthResponse::now();
        assert_eq!(health.status, "OK");
        assert!(health.timestamp.ends_with('Z'));

        let parsed = DateTime::parse_from_rfc3339(&health.timestamp).unwrap();
        // millisecond truncation can put the stamp up to 1ms before `before`
        assert!((parsed.timestamp_millis() - before.timestamp_millis()).abs() < 5_000);
    }
}

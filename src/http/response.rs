//! HTTP response building module
//!
//! Builders for the handful of responses the relay produces.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

const ALLOW: &str = "GET, HEAD, POST, OPTIONS";

/// Finish a builder, falling back to an empty response if a header was invalid
fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => finish(
            Response::builder()
                .status(status)
                .header("Content-Type", "application/json; charset=utf-8")
                .header("Content-Length", json.len()),
            Bytes::from(json),
            "JSON",
        ),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            finish(
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header("Content-Type", "application/json; charset=utf-8"),
                Bytes::from_static(br#"{"success":false,"error":"Internal server error"}"#),
                "500",
            )
        }
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain"),
        Bytes::from_static(b"404 Not Found"),
        "404",
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Content-Type", "text/plain")
            .header("Allow", ALLOW),
        Bytes::from_static(b"405 Method Not Allowed"),
        "405",
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOW);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOW)
            .header("Access-Control-Allow-Headers", "Content-Type, Content-Length")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Bytes::new(), "OPTIONS")
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .header("ETag", etag)
            .header("Cache-Control", "public, max-age=0"),
        Bytes::new(),
        "304",
    )
}

/// Build 200 response for a static file; `HEAD` keeps the headers and drops the body
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("ETag", etag)
            .header("Cache-Control", "public, max-age=0"),
        body,
        "200",
    )
}

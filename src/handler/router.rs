//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access logging, method checks and
//! dispatch to the workflow API, the health endpoint or static files.

use crate::config::AppState;
use crate::error::error_envelope;
use crate::handler::{health, static_files, workflow};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request information needed by the static file handler
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;

    if state.config.http.enable_cors {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::POST, "/api/start-workflow") => workflow::start_workflow(req, state).await,
        (&Method::POST, "/api/resume-workflow") => workflow::resume_workflow(req, state).await,
        (&Method::GET | &Method::HEAD, "/api/health") => health::health(),
        (&Method::OPTIONS, _) => http::build_options_response(state.config.http.enable_cors),
        (_, p) if is_api_path(p) => {
            logger::log_warning(&format!("No API route for {method} {p}"));
            http::json_response(StatusCode::NOT_FOUND, &error_envelope("Not Found"))
        }
        (&Method::GET | &Method::HEAD, _) => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: req
                    .headers()
                    .get("if-none-match")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state.config.static_files).await
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use serde_json::Value;

    fn test_config(static_dir: &str) -> Config {
        let mut cfg = Config::load_from("does-not-exist/relay-config").unwrap();
        cfg.static_files.dir = static_dir.to_string();
        cfg.relay.webhook_url = "http://127.0.0.1:9/unreachable".to_string();
        cfg
    }

    fn test_state(static_dir: &str) -> Arc<AppState> {
        Arc::new(AppState::new(&test_config(static_dir)).unwrap())
    }

    fn cors_state(static_dir: &str) -> Arc<AppState> {
        let mut cfg = test_config(static_dir);
        cfg.http.enable_cors = true;
        Arc::new(AppState::new(&cfg).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, Bytes) {
        let resp = handle_request(req, Arc::clone(state), peer()).await.unwrap();
        let status = resp.status();
        (status, resp.into_body().collect().await.unwrap().to_bytes())
    }

    fn request(method: Method, uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let state = test_state("public");
        let (status, body) = send(&state, request(Method::GET, "/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "OK");
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_json_404() {
        let state = test_state("public");
        let (status, body) = send(&state, request(Method::GET, "/api/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_method_not_allowed_outside_api() {
        let state = test_state("public");
        let (status, _) = send(&state, request(Method::DELETE, "/index.html")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_resume_url_is_400() {
        let state = test_state("public");
        for uri in ["/api/resume-workflow", "/api/resume-workflow?resumeUrl="] {
            let (status, body) = send(&state, request(Method::POST, uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "Resume URL is required");
        }
    }

    #[tokio::test]
    async fn test_start_workflow_unreachable_is_500() {
        let state = test_state("public");
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/start-workflow")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(b"{\"a\":1}")))
            .unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to start workflow");
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>invoices</h1>").unwrap();
        let state = test_state(dir.path().to_str().unwrap());

        let (status, body) = send(&state, request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"<h1>invoices</h1>"));
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let state = test_state("public");
        let resp = handle_request(request(Method::OPTIONS, "/api/start-workflow"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, POST, OPTIONS");
        assert!(resp.headers().get("access-control-allow-origin").is_none());

        let state = cors_state("public");
        let resp = handle_request(request(Method::OPTIONS, "/api/resume-workflow"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            resp.headers()["access-control-allow-methods"],
            "GET, HEAD, POST, OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_cors_header_on_regular_responses() {
        let state = test_state("public");
        let plain = handle_request(request(Method::GET, "/api/health"), state, peer())
            .await
            .unwrap();
        assert!(plain.headers().get("access-control-allow-origin").is_none());

        let state = cors_state("public");
        for uri in ["/api/health", "/api/unknown"] {
            let resp = handle_request(request(Method::GET, uri), Arc::clone(&state), peer())
                .await
                .unwrap();
            assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        }
    }

    #[tokio::test]
    async fn test_head_static_file_has_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>invoices</h1>").unwrap();
        let state = test_state(dir.path().to_str().unwrap());

        let resp = handle_request(request(Method::HEAD, "/index.html"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "17");
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert!(resp.into_body().collect().await.unwrap().to_bytes().is_empty());
    }
}

//! Start / resume workflow handlers
//!
//! Thin adapters between the inbound request and [`crate::relay`]: extract
//! what the relay needs, turn its result or error into a JSON response.

use crate::config::AppState;
use crate::error::{error_envelope, RelayError, Result};
use crate::http;
use crate::logger;
use crate::relay::{self, ForwardOptions, ForwardedBody};
use http_body_util::{BodyDataStream, BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn forward_options(state: &AppState) -> ForwardOptions<'_> {
    ForwardOptions {
        tracking_id_field: &state.config.relay.tracking_id_field,
        log_payloads: state.config.logging.log_payloads,
    }
}

fn body_limit(state: &AppState) -> usize {
    usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// `resumeUrl` query parameter, percent-decoded; empty counts as missing
pub fn resume_url_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "resumeUrl")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Reject a declared Content-Length above the configured maximum
fn check_declared_length<B>(req: &Request<B>, max_body_size: u64) -> Result<()> {
    let declared = header_string(req, "content-length").and_then(|v| v.parse::<u64>().ok());
    match declared {
        Some(size) if size > max_body_size => Err(RelayError::BodyTooLarge { max: max_body_size }),
        _ => Ok(()),
    }
}

fn map_body_error(err: BoxError, max: u64) -> RelayError {
    if err.downcast_ref::<LengthLimitError>().is_some() {
        RelayError::BodyTooLarge { max }
    } else {
        RelayError::ReadBody(err.to_string())
    }
}

/// Buffer and parse the caller's JSON body; an empty body becomes `{}`
async fn read_json_body<B>(req: Request<B>, state: &AppState) -> Result<Value>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let max = state.config.http.max_body_size;
    check_declared_length(&req, max)?;

    let bytes = Limited::new(req.into_body(), body_limit(state))
        .collect()
        .await
        .map_err(|e| map_body_error(e, max))?
        .to_bytes();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn client_error_response(err: &RelayError) -> Response<Full<Bytes>> {
    logger::log_warning(&err.to_string());
    http::json_response(err.status(), &error_envelope(&err.to_string()))
}

/// `POST /api/start-workflow`
pub async fn start_workflow<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    tracing::info!("Starting workflow");

    let payload = match read_json_body(req, state).await {
        Ok(payload) => payload,
        Err(e) => return client_error_response(&e),
    };

    match relay::start_workflow(
        &state.client,
        &state.config.relay.webhook_url,
        &payload,
        forward_options(state),
    )
    .await
    {
        Ok(reply) => http::json_response(StatusCode::OK, &reply),
        Err(e) => {
            logger::log_error(&format!("Error starting workflow: {e}"));
            http::json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &error_envelope("Failed to start workflow"),
            )
        }
    }
}

/// `POST /api/resume-workflow?resumeUrl=<url>`
///
/// The body is streamed to the resume URL as it arrives.
pub async fn resume_workflow<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let Some(resume_url) = resume_url_from_query(req.uri().query()) else {
        return client_error_response(&RelayError::MissingResumeUrl);
    };

    let max = state.config.http.max_body_size;
    if let Err(e) = check_declared_length(&req, max) {
        return client_error_response(&e);
    }

    let content_type = header_string(&req, "content-type");
    let content_length = header_string(&req, "content-length");

    // a chunked body only hits the limit mid-upload, where reqwest reports it
    // as a send failure
    let over_limit = Arc::new(AtomicBool::new(false));
    let limit_hit = Arc::clone(&over_limit);
    let body = Limited::new(req.into_body(), body_limit(state)).map_err(move |e: BoxError| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            limit_hit.store(true, Ordering::Relaxed);
        }
        e
    });
    let forwarded = ForwardedBody {
        content_type,
        content_length,
        body: reqwest::Body::wrap_stream(BodyDataStream::new(body)),
    };

    match relay::resume_workflow(&state.client, &resume_url, forwarded, forward_options(state))
        .await
    {
        Ok(reply) => http::json_response(StatusCode::OK, &reply),
        Err(_) if over_limit.load(Ordering::Relaxed) => {
            client_error_response(&RelayError::BodyTooLarge { max })
        }
        Err(e) => {
            logger::log_error(&format!("Error resuming workflow: {e}"));
            http::json_response(
                e.status(),
                &error_envelope(&format!("Failed to resume workflow: {e}")),
            )
        }
    }
}

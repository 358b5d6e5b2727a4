//! Outbound calls to the workflow engine

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::Value;

use super::normalize;
use crate::error::{RelayError, Result};
use crate::logger;

/// Body of a resume call plus the framing headers copied from the caller
pub struct ForwardedBody {
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub body: reqwest::Body,
}

/// Settings shared by both forwarding calls
#[derive(Debug, Clone, Copy)]
pub struct ForwardOptions<'a> {
    pub tracking_id_field: &'a str,
    pub log_payloads: bool,
}

/// POST the caller's JSON to the start webhook and hand back its reply
///
/// The downstream status code is not inspected: any body that parses as
/// JSON is returned as-is.
pub async fn start_workflow(
    client: &reqwest::Client,
    webhook_url: &str,
    payload: &Value,
    opts: ForwardOptions<'_>,
) -> Result<Value> {
    logger::log_downstream_request("start", webhook_url, Some("application/json"), None);

    let response = client.post(webhook_url).json(payload).send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    logger::log_downstream_response(
        "start",
        webhook_url,
        status.as_u16(),
        &headers,
        &text,
        opts.log_payloads,
    );

    Ok(normalize::start_response(&text))
}

/// POST the caller's body to a resume URL and normalize the reply
///
/// Non-2xx replies become [`RelayError::Downstream`] carrying the status and
/// the reply text.
pub async fn resume_workflow(
    client: &reqwest::Client,
    resume_url: &str,
    forwarded: ForwardedBody,
    opts: ForwardOptions<'_>,
) -> Result<Value> {
    logger::log_downstream_request(
        "resume",
        resume_url,
        forwarded.content_type.as_deref(),
        forwarded.content_length.as_deref(),
    );

    let mut request = client.post(resume_url);
    if let Some(content_type) = forwarded.content_type {
        request = request.header(CONTENT_TYPE, content_type);
    }
    if let Some(content_length) = forwarded.content_length {
        request = request.header(CONTENT_LENGTH, content_length);
    }

    let response = request.body(forwarded.body).send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    logger::log_downstream_response(
        "resume",
        resume_url,
        status.as_u16(),
        &headers,
        &text,
        opts.log_payloads,
    );

    if !status.is_success() {
        return Err(RelayError::Downstream {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(normalize::resume_response(&text, opts.tracking_id_field))
}

//! Logger module
//!
//! Provides logging utilities for the relay including:
//! - `tracing` subscriber setup (compact or JSON output)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Downstream exchange logging

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .try_init()?;
    }
    Ok(())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Workflow relay running at http://{addr}");
    tracing::info!("Serving static files from {}", config.static_files.dir);
    tracing::info!("API endpoints available at /api/*");
    tracing::info!(webhook = %config.relay.webhook_url, "Start-workflow webhook");
    if let Some(workers) = config.worker_threads() {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

/// Outbound call about to be made
pub fn log_downstream_request(
    kind: &str,
    url: &str,
    content_type: Option<&str>,
    content_length: Option<&str>,
) {
    tracing::info!(
        kind,
        url,
        content_type = content_type.unwrap_or("-"),
        content_length = content_length.unwrap_or("-"),
        "Sending request to workflow engine"
    );
}

/// Downstream answer, raw body only when payload logging is on
pub fn log_downstream_response(
    kind: &str,
    url: &str,
    status: u16,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    log_payloads: bool,
) {
    tracing::info!(kind, url, status, length = body.len(), "Workflow engine responded");
    if log_payloads {
        tracing::debug!(kind, ?headers, "Response headers");
        tracing::debug!(kind, body, "Raw response body");
    }
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!(active_connections, "Shutdown requested, no longer accepting connections");
}

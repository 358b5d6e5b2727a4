//! HTTP relay between a browser frontend and a webhook-driven workflow engine.
//!
//! `POST /api/start-workflow` and `POST /api/resume-workflow` are forwarded to
//! the engine, `GET /api/health` reports liveness, everything else is served
//! from a static directory.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod relay;
pub mod server;

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Serve the relay on an already-bound listener until `shutdown` fires
pub async fn serve(
    listener: TcpListener,
    config: &config::Config,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(config::AppState::new(config)?);
    server::start_server_loop(listener, state, shutdown).await?;
    Ok(())
}

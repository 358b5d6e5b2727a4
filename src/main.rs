use std::sync::Arc;
use tokio::sync::Notify;

use workflow_relay::{config, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg).map_err(|e| e.to_string())?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.worker_threads() {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&addr, &cfg);
    workflow_relay::serve(listener, &cfg, shutdown).await
}

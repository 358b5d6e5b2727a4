// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RelayConfig, ServerConfig,
    StaticFilesConfig,
};

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Environment variables use the `RELAY_` prefix and `__` as section separator,
    /// e.g. `RELAY_SERVER__PORT=8080`
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.format", "compact")?
            .set_default("logging.log_payloads", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "workflow-relay")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default(
                "relay.webhook_url",
                "http://localhost:5678/webhook-test/invoice-postman",
            )?
            .set_default("relay.tracking_id_field", "xfxTrackingId")?
            .set_default("relay.request_timeout", 0)?
            .set_default("static_files.dir", "public")?
            .set_default("static_files.index_files", vec!["index.html"])?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Worker thread count for the runtime builder; 0 means "use the default"
    pub fn worker_threads(&self) -> Option<usize> {
        self.server.workers.filter(|&n| n > 0)
    }
}

// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub relay: RelayConfig,
    pub static_files: StaticFilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, `None` or 0 uses the runtime default
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Subscriber output: `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log raw downstream headers and bodies at debug level
    #[serde(default = "default_log_payloads")]
    pub log_payloads: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_log_format() -> String {
    "compact".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_log_payloads() -> bool {
    true
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a connection may wait for the next request's headers, 0 disables it
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Downstream automation engine settings
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Webhook that starts a workflow
    pub webhook_url: String,
    /// Field whose presence marks an unwrappable array response on resume
    pub tracking_id_field: String,
    /// Downstream request timeout in seconds, 0 disables it
    pub request_timeout: u64,
}

/// Static file serving
#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesConfig {
    pub dir: String,
    pub index_files: Vec<String>,
}

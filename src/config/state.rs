// Application state module
// Holds the loaded configuration and the downstream client

use std::time::Duration;

use super::types::Config;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,

    /// Pooled client for downstream webhook calls
    pub client: reqwest::Client,

    access_log: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.http.server_name.clone());
        if config.relay.request_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.relay.request_timeout));
        }

        Ok(Self {
            config: config.clone(),
            client: builder.build()?,
            access_log: config.logging.access_log,
        })
    }

    /// Whether access logging is enabled
    pub const fn access_log_enabled(&self) -> bool {
        self.access_log
    }
}

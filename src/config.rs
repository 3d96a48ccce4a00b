use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Retrieval engine gateway configuration
    pub gateway: GatewayConfig,

    /// Search orchestration tuning
    pub search: SearchConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: PAYMENT_SEARCH_)
            .add_source(
                config::Environment::with_prefix("PAYMENT_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            search: SearchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the retrieval engine endpoint
    #[serde(default = "default_engine_url")]
    pub engine_url: String,

    /// Request timeout (seconds); a timeout is a retrieval failure
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            engine_url: default_engine_url(),
            timeout_secs: default_gateway_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Debounce delay for free-text input (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum admitted search term length; shorter non-empty terms are
    /// suppressed rather than sent to the engine
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
}

impl SearchConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            min_term_len: default_min_term_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5001
}

fn default_engine_url() -> String {
    "http://localhost:9200/api/payments".to_string()
}

fn default_gateway_timeout() -> u64 {
    10
}

fn default_page_size() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_term_len() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.http_port, 5001);
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.min_term_len, 3);
        assert_eq!(config.search.debounce_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed.search.debounce_ms, 500);
        assert_eq!(parsed.gateway.timeout_secs, 10);
    }
}

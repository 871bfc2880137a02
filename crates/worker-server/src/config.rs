use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Redis connection URL for the credential and status stores
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Salesforce REST API version
    #[serde(default = "default_sf_api_version")]
    pub sf_api_version: String,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_sf_api_version() -> String {
    common::DEFAULT_API_VERSION.to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("WORKER"))
            .build()?
            .try_deserialize()
    }
}

//! Application Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `ivfit.toml` in the working directory, then `IVFIT__*` environment
//! variables (`IVFIT__SERVER__PORT=8080`).

use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use storage::StorageConfig;

/// Config file looked up in the working directory (any format `config` knows)
const CONFIG_FILE: &str = "ivfit";

const ENV_PREFIX: &str = "IVFIT";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

/// HTTP bind settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load from `ivfit.*` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load with an explicit config file name or path
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

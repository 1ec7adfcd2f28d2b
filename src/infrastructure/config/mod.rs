use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a decoded upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Defaults, overridden by `tabledash.toml`, overridden by `TABLEDASH_*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file("tabledash.toml"))
            .merge(Env::prefixed("TABLEDASH_"))
            .extract()
            .map_err(|e| AppError::Internal(format!("failed to load config: {}", e)))
    }
}

//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Object storage API base URL; media re-hosting is disabled when unset.
    pub storage_url: Option<String>,
    /// Object storage bucket.
    pub storage_bucket: String,
    /// Object storage service key.
    pub storage_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WEBHOOK_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:crm.db?mode=rwc` |
    /// | `STORAGE_URL` | Object storage base URL | (unset: no re-hosting) |
    /// | `STORAGE_BUCKET` | Media bucket | `media` |
    /// | `STORAGE_KEY` | Storage service key | (required with `STORAGE_URL`) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("WEBHOOK_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:crm.db?mode=rwc".to_string());

        let storage_url = env::var("STORAGE_URL").ok().filter(|v| !v.trim().is_empty());
        let storage_bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "media".to_string());
        let storage_key = env::var("STORAGE_KEY").unwrap_or_default();

        if storage_url.is_some() && storage_key.is_empty() {
            return Err(ConfigError::MissingStorageKey);
        }

        Ok(Self {
            addr,
            database_url,
            storage_url,
            storage_bucket,
            storage_key,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid WEBHOOK_ADDR format")]
    InvalidAddr,

    #[error("STORAGE_KEY is required when STORAGE_URL is set")]
    MissingStorageKey,
}

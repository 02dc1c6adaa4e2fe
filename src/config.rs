//! Application configuration loaded from environment variables.
//!
//! All variables are optional:
//! - `STOCKS_DATABASE_PATH` - SQLite database file (default `stocks.db`)
//! - `STOCKS_HOST` - API bind host (default `127.0.0.1`)
//! - `STOCKS_PORT` - API bind port (default `8000`)
//! - `STOCKS_INGEST_MODE` - `atomic` or `best-effort` (default `atomic`)
//!
//! Command line flags override these values in `main`.

use crate::error::{AppError, Result};
use crate::ingest::IngestMode;
use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "stocks.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub server: ServerConfig,
    pub ingest_mode: IngestMode,
}

/// HTTP server bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            ingest_mode: IngestMode::default(),
        }
    }
}

/// Loads the application configuration from the process environment.
///
/// # Errors
///
/// Returns [`AppError::Config`] if `STOCKS_PORT` is not a valid port or
/// `STOCKS_INGEST_MODE` names an unknown mode.
pub fn fetch_config() -> Result<AppConfig> {
    fetch_config_from(|name| std::env::var(name).ok())
}

/// Same as [`fetch_config`] but reads variables through `lookup`.
pub fn fetch_config_from<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());
    let mut config = AppConfig::default();

    if let Some(path) = var("STOCKS_DATABASE_PATH") {
        config.database_path = PathBuf::from(path);
    }

    if let Some(host) = var("STOCKS_HOST") {
        config.server.host = host;
    }

    if let Some(port) = var("STOCKS_PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid STOCKS_PORT '{}': {}", port, e)))?;
    }

    if let Some(mode) = var("STOCKS_INGEST_MODE") {
        config.ingest_mode = mode.parse()?;
    }

    Ok(config)
}

//! Application state management

use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::{AppError, Result};
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Built once at startup from an explicit [`AppConfig`]; dropping it
/// closes the database.
pub struct AppState {
    /// SQLite database connection
    pub sqlite: Arc<SqliteDb>,

    /// Configuration the state was built from
    pub config: AppConfig,
}

impl AppState {
    /// Create new application state, opening the configured database file
    pub fn new(config: AppConfig) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Config(format!(
                        "Failed to create database directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }

        tracing::info!("Database path: {:?}", config.database_path);

        let sqlite = Arc::new(SqliteDb::open(&config.database_path)?);

        Ok(Self { sqlite, config })
    }

    /// Create state around an already opened database
    pub fn with_database(config: AppConfig, sqlite: SqliteDb) -> Self {
        Self {
            sqlite: Arc::new(sqlite),
            config,
        }
    }
}

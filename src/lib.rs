//! Stock Records
//!
//! Loads exported daily stock market data into SQLite and serves it over a
//! small CRUD REST API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod services;
pub mod state;

pub use config::{fetch_config, AppConfig};
pub use error::{AppError, Result};
pub use state::AppState;

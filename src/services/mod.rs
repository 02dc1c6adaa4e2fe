//! Services Layer
//!
//! Business logic between the REST API handlers and the database.
//!
//! # Architecture
//!
//! ```text
//! REST API --> Services --> SqliteDb
//! CLI load --> ingest ----> SqliteDb
//! ```

pub mod stock_service;

pub use stock_service::StockService;

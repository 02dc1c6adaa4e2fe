//! Database layer
//!
//! SQLite is the single storage engine; it owns every persisted row.

pub mod sqlite;

pub use sqlite::SqliteDb;

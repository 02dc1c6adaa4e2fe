//! SQLite database module

pub mod models;
mod connection;
mod migrations;
mod stock_data;

use crate::error::Result;
pub use models::{NewStockRecord, StockRecord, StockRecordChanges};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
///
/// rusqlite connections are not `Sync`, so the single connection sits
/// behind a mutex. Transactional guarantees come from SQLite itself.
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Open (or create) the database file and apply migrations
    pub fn open(path: &Path) -> Result<Self> {
        let conn = connection::create_connection(path)?;
        tracing::info!("Opened SQLite database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Open a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = connection::create_memory_connection()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Stock Record Methods ==========

    /// Get all stock records
    pub fn list_stock_records(&self) -> Result<Vec<StockRecord>> {
        let conn = self.conn.lock();
        stock_data::list_stock_records(&conn)
    }

    /// Get a stock record by id
    pub fn get_stock_record(&self, id: i64) -> Result<StockRecord> {
        let conn = self.conn.lock();
        stock_data::get_stock_record(&conn, id)
    }

    /// Count stock records
    pub fn count_stock_records(&self) -> Result<i64> {
        let conn = self.conn.lock();
        stock_data::count_stock_records(&conn)
    }

    /// Create a stock record
    pub fn create_stock_record(&self, record: &NewStockRecord) -> Result<StockRecord> {
        let conn = self.conn.lock();
        stock_data::create_stock_record(&conn, record)
    }

    /// Create many stock records atomically
    pub fn create_stock_records(&self, records: &[NewStockRecord]) -> Result<usize> {
        let mut conn = self.conn.lock();
        stock_data::create_stock_records(&mut conn, records)
    }

    /// Replace all mutable fields of a stock record
    pub fn replace_stock_record(&self, id: i64, record: &NewStockRecord) -> Result<StockRecord> {
        let conn = self.conn.lock();
        stock_data::replace_stock_record(&conn, id, record)
    }

    /// Update selected fields of a stock record
    pub fn update_stock_record(
        &self,
        id: i64,
        changes: &StockRecordChanges,
    ) -> Result<StockRecord> {
        let conn = self.conn.lock();
        stock_data::update_stock_record(&conn, id, changes)
    }

    /// Delete a stock record
    pub fn delete_stock_record(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        stock_data::delete_stock_record(&conn, id)
    }
}

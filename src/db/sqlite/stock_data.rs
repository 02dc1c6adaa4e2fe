//! Stock record persistence
//!
//! CRUD over the `stock_data` table. Prices are stored as decimal text and
//! parsed back into `Decimal` on read.

use crate::db::sqlite::models::{NewStockRecord, StockRecord, StockRecordChanges};
use crate::error::{AppError, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const SELECT_COLUMNS: &str =
    "SELECT id, date, trade_code, high, low, open, close, volume FROM stock_data";

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_stock_row(row: &Row<'_>) -> rusqlite::Result<StockRecord> {
    Ok(StockRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        trade_code: row.get(2)?,
        high: decimal_column(row, 3)?,
        low: decimal_column(row, 4)?,
        open: decimal_column(row, 5)?,
        close: decimal_column(row, 6)?,
        volume: row.get(7)?,
    })
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Stock record not found: {}", id))
}

/// Get all stock records in insertion order
pub fn list_stock_records(conn: &Connection) -> Result<Vec<StockRecord>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;

    let records = stmt
        .query_map([], map_stock_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Get stock record by ID
pub fn get_stock_record(conn: &Connection, id: i64) -> Result<StockRecord> {
    conn.query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id], map_stock_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => not_found(id),
            _ => e.into(),
        })
}

/// Count stored stock records
pub fn count_stock_records(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM stock_data", [], |row| row.get(0))?;
    Ok(count)
}

fn insert(conn: &Connection, record: &NewStockRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO stock_data (date, trade_code, high, low, open, close, volume)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.date,
            record.trade_code,
            record.high.to_string(),
            record.low.to_string(),
            record.open.to_string(),
            record.close.to_string(),
            record.volume,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Insert a single stock record and return it with its assigned id
pub fn create_stock_record(conn: &Connection, record: &NewStockRecord) -> Result<StockRecord> {
    let id = insert(conn, record)?;
    Ok(record.clone().with_id(id))
}

/// Insert many stock records in one transaction; nothing is written on failure
pub fn create_stock_records(conn: &mut Connection, records: &[NewStockRecord]) -> Result<usize> {
    let tx = conn.transaction()?;

    for record in records {
        insert(&tx, record)?;
    }

    tx.commit()?;

    tracing::debug!("Inserted {} stock records in one transaction", records.len());
    Ok(records.len())
}

/// Replace every mutable column of a stock record
pub fn replace_stock_record(
    conn: &Connection,
    id: i64,
    record: &NewStockRecord,
) -> Result<StockRecord> {
    let rows = conn.execute(
        "UPDATE stock_data
         SET date = ?1, trade_code = ?2, high = ?3, low = ?4, open = ?5, close = ?6, volume = ?7
         WHERE id = ?8",
        params![
            record.date,
            record.trade_code,
            record.high.to_string(),
            record.low.to_string(),
            record.open.to_string(),
            record.close.to_string(),
            record.volume,
            id,
        ],
    )?;

    if rows == 0 {
        return Err(not_found(id));
    }

    Ok(record.clone().with_id(id))
}

/// Update only the provided columns of a stock record
pub fn update_stock_record(
    conn: &Connection,
    id: i64,
    changes: &StockRecordChanges,
) -> Result<StockRecord> {
    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(d) = changes.date {
        updates.push("date = ?");
        params.push(Box::new(d));
    }
    if let Some(t) = &changes.trade_code {
        updates.push("trade_code = ?");
        params.push(Box::new(t.clone()));
    }
    for (column, value) in [
        ("high = ?", changes.high),
        ("low = ?", changes.low),
        ("open = ?", changes.open),
        ("close = ?", changes.close),
    ] {
        if let Some(v) = value {
            updates.push(column);
            params.push(Box::new(v.to_string()));
        }
    }
    if let Some(v) = changes.volume {
        updates.push("volume = ?");
        params.push(Box::new(v));
    }

    if updates.is_empty() {
        return get_stock_record(conn, id);
    }

    let sql = format!("UPDATE stock_data SET {} WHERE id = ?", updates.join(", "));
    params.push(Box::new(id));

    let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = conn.execute(&sql, params_refs.as_slice())?;

    if rows == 0 {
        return Err(not_found(id));
    }

    get_stock_record(conn, id)
}

/// Delete a stock record
pub fn delete_stock_record(conn: &Connection, id: i64) -> Result<()> {
    let rows = conn.execute("DELETE FROM stock_data WHERE id = ?", [id])?;

    if rows == 0 {
        return Err(not_found(id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::migrations::run_migrations;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn acme() -> NewStockRecord {
        NewStockRecord {
            date: NaiveDate::from_ymd_opt(2016, 2, 16).unwrap(),
            trade_code: "ACME".to_string(),
            high: dec!(36.5),
            low: dec!(35.0),
            open: dec!(36.0),
            close: dec!(35.8),
            volume: 452069,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = create_test_db();

        let created = create_stock_record(&conn, &acme()).unwrap();
        assert!(created.id > 0);

        let fetched = get_stock_record(&conn, created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.high, dec!(36.5));
        assert_eq!(fetched.volume, 452069);
    }

    #[test]
    fn test_decimal_scale_survives_storage() {
        let conn = create_test_db();
        let mut record = acme();
        record.close = dec!(1234.50);

        let created = create_stock_record(&conn, &record).unwrap();
        let fetched = get_stock_record(&conn, created.id).unwrap();
        assert_eq!(fetched.close.to_string(), "1234.50");
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let conn = create_test_db();
        let mut second = acme();
        second.trade_code = "BETA".to_string();

        let a = create_stock_record(&conn, &acme()).unwrap();
        let b = create_stock_record(&conn, &second).unwrap();

        let records = list_stock_records(&conn).unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id, b.id]);
    }

    #[test]
    fn test_get_missing_record() {
        let conn = create_test_db();
        let result = get_stock_record(&conn, 42);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_batch_insert_rolls_back_on_failure() {
        let mut conn = create_test_db();
        let mut bad = acme();
        bad.trade_code = " ".to_string();

        let result = create_stock_records(&mut conn, &[acme(), bad]);
        assert!(result.is_err());
        assert_eq!(count_stock_records(&conn).unwrap(), 0);
    }

    #[test]
    fn test_replace_keeps_id() {
        let conn = create_test_db();
        let created = create_stock_record(&conn, &acme()).unwrap();

        let replacement = NewStockRecord {
            date: NaiveDate::from_ymd_opt(2016, 2, 17).unwrap(),
            trade_code: "ACMEX".to_string(),
            high: dec!(40),
            low: dec!(38.25),
            open: dec!(39),
            close: dec!(39.5),
            volume: 1000,
        };
        let updated = replace_stock_record(&conn, created.id, &replacement).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(get_stock_record(&conn, created.id).unwrap(), replacement.with_id(created.id));
    }

    #[test]
    fn test_replace_missing_record() {
        let conn = create_test_db();
        let result = replace_stock_record(&conn, 9, &acme());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_partial_update() {
        let conn = create_test_db();
        let created = create_stock_record(&conn, &acme()).unwrap();

        let changes = StockRecordChanges {
            close: Some(dec!(36.1)),
            volume: Some(10),
            ..Default::default()
        };
        let updated = update_stock_record(&conn, created.id, &changes).unwrap();
        assert_eq!(updated.close, dec!(36.1));
        assert_eq!(updated.volume, 10);
        assert_eq!(updated.trade_code, "ACME");
        assert_eq!(updated.high, dec!(36.5));
    }

    #[test]
    fn test_empty_partial_update_on_missing_record() {
        let conn = create_test_db();
        let result = update_stock_record(&conn, 3, &StockRecordChanges::default());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_twice() {
        let conn = create_test_db();
        let created = create_stock_record(&conn, &acme()).unwrap();

        delete_stock_record(&conn, created.id).unwrap();
        assert_eq!(count_stock_records(&conn).unwrap(), 0);

        let again = delete_stock_record(&conn, created.id);
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}

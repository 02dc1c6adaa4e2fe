//! Parsing for exported stock data
//!
//! Numbers in the export are text with `,` grouping separators
//! (`"1,234.50"`, `"4,52,069"`). Every `,` is removed before conversion;
//! the position of the separators is not checked.

use crate::db::sqlite::NewStockRecord;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::num::ParseIntError;
use std::str::FromStr;

/// Date pattern used by the export and the API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Remove grouping separators and surrounding whitespace
pub fn strip_grouping(text: &str) -> String {
    text.replace(',', "").trim().to_string()
}

/// Decimal conversion shared by the loader and the API
pub fn decimal_from_grouped(text: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(&strip_grouping(text))
}

/// Integer conversion shared by the loader and the API
pub fn integer_from_grouped(text: &str) -> std::result::Result<i64, ParseIntError> {
    strip_grouping(text).parse()
}

/// Parse a comma-grouped decimal such as `"1,234.50"`
pub fn parse_grouped_decimal(field: &str, text: &str) -> Result<Decimal> {
    decimal_from_grouped(text).map_err(|e| {
        AppError::IngestionFormat(format!("{} '{}' is not a decimal: {}", field, text, e))
    })
}

/// Parse a comma-grouped integer such as `"4,52,069"`
pub fn parse_grouped_integer(field: &str, text: &str) -> Result<i64> {
    integer_from_grouped(text).map_err(|e| {
        AppError::IngestionFormat(format!("{} '{}' is not an integer: {}", field, text, e))
    })
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| AppError::Parse(format!("date '{}' is not YYYY-MM-DD: {}", text, e)))
}

/// Reject blank trade codes
pub fn check_trade_code(trade_code: &str) -> Result<()> {
    if trade_code.trim().is_empty() {
        return Err(AppError::IngestionFormat(
            "trade_code must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// One object of the export file, exactly as written
#[derive(Debug, Clone, Deserialize)]
pub struct RawStockRow {
    pub date: String,
    pub trade_code: String,
    pub high: String,
    pub low: String,
    pub open: String,
    pub close: String,
    pub volume: String,
}

impl RawStockRow {
    /// Normalize the text fields into a record ready for insertion
    pub fn into_new_record(self) -> Result<NewStockRecord> {
        check_trade_code(&self.trade_code)?;

        Ok(NewStockRecord {
            date: parse_date(&self.date)?,
            high: parse_grouped_decimal("high", &self.high)?,
            low: parse_grouped_decimal("low", &self.low)?,
            open: parse_grouped_decimal("open", &self.open)?,
            close: parse_grouped_decimal("close", &self.close)?,
            volume: parse_grouped_integer("volume", &self.volume)?,
            trade_code: self.trade_code,
        })
    }
}

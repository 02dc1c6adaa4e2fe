//! SQLite database models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day's trading data for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub trade_code: String,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// A stock record that has not been persisted yet (no id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockRecord {
    pub date: NaiveDate,
    pub trade_code: String,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

impl NewStockRecord {
    /// Attach the id assigned by the database
    pub fn with_id(self, id: i64) -> StockRecord {
        StockRecord {
            id,
            date: self.date,
            trade_code: self.trade_code,
            high: self.high,
            low: self.low,
            open: self.open,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockRecordChanges {
    pub date: Option<NaiveDate>,
    pub trade_code: Option<String>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub open: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<i64>,
}

impl StockRecordChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

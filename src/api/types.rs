//! REST API types
//!
//! Clients (including the React frontend) send prices and volumes either as
//! JSON numbers or as strings, sometimes with `,` grouping separators, so
//! numeric fields use custom deserializers that accept all of these.

use crate::db::sqlite::{NewStockRecord, StockRecordChanges};
use crate::error::{AppError, Result};
use crate::ingest::parse::{decimal_from_grouped, integer_from_grouped};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Custom Deserializers for Client Compatibility
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleNumber {
    Number(serde_json::Number),
    Str(String),
}

impl FlexibleNumber {
    fn into_text(self) -> String {
        match self {
            FlexibleNumber::Number(n) => n.to_string(),
            FlexibleNumber::Str(s) => s,
        }
    }
}

fn decimal_from_text<E: serde::de::Error>(text: &str) -> std::result::Result<Decimal, E> {
    decimal_from_grouped(text).map_err(|e| E::custom(format!("invalid decimal '{}': {}", text, e)))
}

fn integer_from_text<E: serde::de::Error>(text: &str) -> std::result::Result<i64, E> {
    integer_from_grouped(text).map_err(|e| E::custom(format!("invalid integer '{}': {}", text, e)))
}

/// Deserialize a decimal given as a number or a (possibly grouped) string
fn deserialize_flexible_decimal<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = FlexibleNumber::deserialize(deserializer)?.into_text();
    decimal_from_text(&text)
}

/// Deserialize an integer given as a number or a (possibly grouped) string
fn deserialize_flexible_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = FlexibleNumber::deserialize(deserializer)?.into_text();
    integer_from_text(&text)
}

fn deserialize_optional_decimal<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlexibleNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => decimal_from_text(&n.into_text()).map(Some),
    }
}

fn deserialize_optional_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlexibleNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => integer_from_text(&n.into_text()).map(Some),
    }
}

fn validate_trade_code(trade_code: &str) -> Result<()> {
    if trade_code.trim().is_empty() {
        return Err(AppError::Validation("trade_code must not be empty".to_string()));
    }
    Ok(())
}

// ============================================================================
// Common Types
// ============================================================================

/// Status envelope used by the health check
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn success_with_message(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
        }
    }
}

// ============================================================================
// Stock Record Request Types
// ============================================================================

/// Full stock record body - POST create, PUT update
///
/// Every field is required; an `id` in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StockPayload {
    pub date: NaiveDate,
    pub trade_code: String,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub high: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub low: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub open: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub close: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_i64")]
    pub volume: i64,
}

impl StockPayload {
    pub fn into_new_record(self) -> Result<NewStockRecord> {
        validate_trade_code(&self.trade_code)?;

        Ok(NewStockRecord {
            date: self.date,
            trade_code: self.trade_code,
            high: self.high,
            low: self.low,
            open: self.open,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// Partial stock record body - PATCH update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub trade_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub high: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub low: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub close: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub volume: Option<i64>,
}

impl StockPatch {
    pub fn into_changes(self) -> Result<StockRecordChanges> {
        if let Some(code) = &self.trade_code {
            validate_trade_code(code)?;
        }

        Ok(StockRecordChanges {
            date: self.date,
            trade_code: self.trade_code,
            high: self.high,
            low: self.low,
            open: self.open,
            close: self.close,
            volume: self.volume,
        })
    }
}

//! Stock data ingestion
//!
//! Loads a JSON array of exported stock rows into the `stock_data` table,
//! one row per object, in file order. Re-loading a file inserts duplicates.
//!
//! Two modes:
//! - `atomic` parses every record first and inserts them in one
//!   transaction; any bad record aborts the run with nothing written.
//! - `best-effort` inserts records one by one and skips (and reports) the
//!   ones that fail to parse. Storage errors still abort the run.

pub mod parse;

use crate::db::sqlite::{NewStockRecord, SqliteDb};
use crate::error::{AppError, Result};
use parse::RawStockRow;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// File loaded when no path is given
pub const DEFAULT_DATA_FILE: &str = "stock_market_data.json";

/// How a load reacts to records that fail to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IngestMode {
    /// All or nothing
    #[default]
    Atomic,
    /// Keep valid records, skip invalid ones
    BestEffort,
}

impl FromStr for IngestMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(IngestMode::Atomic),
            "best-effort" | "best_effort" => Ok(IngestMode::BestEffort),
            other => Err(AppError::Config(format!(
                "Unknown ingest mode '{}', expected 'atomic' or 'best-effort'",
                other
            ))),
        }
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestMode::Atomic => f.write_str("atomic"),
            IngestMode::BestEffort => f.write_str("best-effort"),
        }
    }
}

/// A record left out of a best-effort load
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Outcome of one load
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub total: usize,
    pub inserted: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Load the JSON export at `path`
pub fn ingest_file(db: &SqliteDb, path: &Path, mode: IngestMode) -> Result<IngestReport> {
    info!("Loading stock data from {:?} ({} mode)", path, mode);

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::ResourceNotFound(format!("{}", path.display()))
        } else {
            AppError::Io(e)
        }
    })?;

    ingest_json(db, &content, mode)
}

/// Load stock rows from JSON text
pub fn ingest_json(db: &SqliteDb, json: &str, mode: IngestMode) -> Result<IngestReport> {
    let items: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| AppError::Parse(format!("Malformed stock data JSON: {}", e)))?;

    let report = match mode {
        IngestMode::Atomic => ingest_atomic(db, items)?,
        IngestMode::BestEffort => ingest_best_effort(db, items)?,
    };

    info!(
        "Loaded {} of {} stock records ({} skipped)",
        report.inserted,
        report.total,
        report.skipped.len()
    );

    Ok(report)
}

fn ingest_atomic(db: &SqliteDb, items: Vec<Value>) -> Result<IngestReport> {
    let total = items.len();
    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect::<Result<Vec<_>>>()?;

    let inserted = db.create_stock_records(&records)?;

    Ok(IngestReport {
        total,
        inserted,
        skipped: Vec::new(),
    })
}

fn ingest_best_effort(db: &SqliteDb, items: Vec<Value>) -> Result<IngestReport> {
    let mut report = IngestReport {
        total: items.len(),
        ..Default::default()
    };

    for (index, item) in items.into_iter().enumerate() {
        match parse_record(index, item) {
            Ok(record) => {
                db.create_stock_record(&record)?;
                report.inserted += 1;
            }
            Err(e) => {
                warn!("Skipping stock record: {}", e);
                report.skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Convert one JSON object, tagging any error with its position in the file
fn parse_record(index: usize, item: Value) -> Result<NewStockRecord> {
    let raw: RawStockRow = serde_json::from_value(item)
        .map_err(|e| AppError::IngestionFormat(format!("record {}: {}", index, e)))?;

    raw.into_new_record().map_err(|e| match e {
        AppError::Parse(msg) => AppError::Parse(format!("record {}: {}", index, msg)),
        AppError::IngestionFormat(msg) => {
            AppError::IngestionFormat(format!("record {}: {}", index, msg))
        }
        other => other,
    })
}

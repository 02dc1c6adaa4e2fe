//! Stock Service
//!
//! List, create, update and delete stock records.
//! Called by the REST API handlers.

use crate::api::types::{StockPatch, StockPayload};
use crate::db::sqlite::StockRecord;
use crate::error::Result;
use crate::state::AppState;
use tracing::info;

/// Stock record service for business logic
pub struct StockService;

impl StockService {
    /// Get every stored stock record
    pub fn list(state: &AppState) -> Result<Vec<StockRecord>> {
        let records = state.sqlite.list_stock_records()?;
        info!("StockService::list - {} records", records.len());
        Ok(records)
    }

    /// Create a stock record from a full payload
    pub fn create(state: &AppState, payload: StockPayload) -> Result<StockRecord> {
        let record = payload.into_new_record()?;
        let created = state.sqlite.create_stock_record(&record)?;

        info!(
            "StockService::create - {} {} (id {})",
            created.trade_code, created.date, created.id
        );
        Ok(created)
    }

    /// Replace every mutable field of a stock record
    ///
    /// The record is looked up before the body is checked, so a missing id
    /// is reported as not found even when the body is also invalid.
    pub fn replace(
        state: &AppState,
        id: i64,
        payload: Result<StockPayload>,
    ) -> Result<StockRecord> {
        info!("StockService::replace - id {}", id);

        state.sqlite.get_stock_record(id)?;
        let record = payload?.into_new_record()?;
        state.sqlite.replace_stock_record(id, &record)
    }

    /// Change only the fields present in the patch
    pub fn update(state: &AppState, id: i64, patch: Result<StockPatch>) -> Result<StockRecord> {
        info!("StockService::update - id {}", id);

        state.sqlite.get_stock_record(id)?;
        let changes = patch?.into_changes()?;
        state.sqlite.update_stock_record(id, &changes)
    }

    /// Delete a stock record
    pub fn delete(state: &AppState, id: i64) -> Result<()> {
        info!("StockService::delete - id {}", id);
        state.sqlite.delete_stock_record(id)
    }
}

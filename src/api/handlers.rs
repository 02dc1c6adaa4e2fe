//! REST API endpoint handlers
//!
//! Each handler extracts its input, delegates to [`StockService`] and lets
//! [`AppError`] pick the status code. Extractor rejections (malformed body,
//! missing field, non-numeric id) become `400 VALIDATION_ERROR`.

use crate::api::types::*;
use crate::db::sqlite::StockRecord;
use crate::error::{AppError, Result};
use crate::services::StockService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

fn record_id(id: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success_with_message("Stock records API is running"))
}

// ============================================================================
// Stock Records
// ============================================================================

/// List all records - GET /stocks/api/stocks/
pub async fn list_stocks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StockRecord>>> {
    StockService::list(&state).map(Json)
}

/// Create a record - POST /stocks/api/stocks/create/
pub async fn create_stock(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<StockPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<StockRecord>)> {
    let payload = body(payload)?;
    let created = StockService::create(&state, payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a record - PUT /stocks/api/stocks/{id}/update/
pub async fn replace_stock(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StockPayload>, JsonRejection>,
) -> Result<Json<StockRecord>> {
    let id = record_id(id)?;
    StockService::replace(&state, id, body(payload)).map(Json)
}

/// Partially update a record - PATCH /stocks/api/stocks/{id}/update/
pub async fn update_stock(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StockPatch>, JsonRejection>,
) -> Result<Json<StockRecord>> {
    let id = record_id(id)?;
    StockService::update(&state, id, body(payload)).map(Json)
}

/// Delete a record - DELETE /stocks/api/stocks/{id}/delete/
pub async fn delete_stock(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let id = record_id(id)?;
    StockService::delete(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

//! REST API module
//!
//! Routes (paths kept compatible with the existing frontend):
//! - `GET    /stocks/api/stocks/` - list all records
//! - `POST   /stocks/api/stocks/create/` - create a record
//! - `PUT    /stocks/api/stocks/{id}/update/` - replace a record
//! - `PATCH  /stocks/api/stocks/{id}/update/` - update some fields
//! - `DELETE /stocks/api/stocks/{id}/delete/` - delete a record
//! - `GET    /health` - liveness

mod server;
pub mod handlers;
pub mod types;

pub use server::{router, ApiServer};
pub use types::{ApiResponse, StockPatch, StockPayload};

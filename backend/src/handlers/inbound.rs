//! HTTP handlers for inbound batch endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::InboundBatch;
use crate::services::StockService;
use crate::AppState;

/// List pending inbound batches for a SKU
pub async fn get_pending_inbound(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<Vec<InboundBatch>>> {
    let service = StockService::new(state.db);
    let batches = service.pending_batches(&sku).await?;
    Ok(Json(batches))
}

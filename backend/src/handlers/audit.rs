//! HTTP handlers for audit trail endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::AuditEntry;
use crate::services::AuditService;
use crate::AppState;

/// Paging parameters for the audit trail
#[derive(Debug, Deserialize)]
pub struct AuditFilter {
    pub limit: Option<i64>,
}

/// Audit trail for a SKU, newest first
pub async fn get_audit_trail(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(filter): Query<AuditFilter>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let service = AuditService::new(state.db);
    let entries = service.list(&sku, filter.limit.unwrap_or(50)).await?;
    Ok(Json(entries))
}

//! HTTP handlers for replenishment policy endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::policy::{PolicyService, UpsertPolicyInput};
use crate::services::AuditService;
use shared::{AuditAction, ReplenishmentPolicy};

use crate::AppState;

/// Get the effective policy for a SKU (system defaults when no row
/// exists)
pub async fn get_policy(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ReplenishmentPolicy>> {
    let service = PolicyService::new(state.db);
    let policy = service.get_or_default(&sku).await?;
    Ok(Json(policy))
}

/// Upsert the policy for a SKU
pub async fn upsert_policy(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(input): Json<UpsertPolicyInput>,
) -> AppResult<Json<ReplenishmentPolicy>> {
    let service = PolicyService::new(state.db.clone());
    let policy = service.upsert(&sku, input).await?;

    AuditService::new(state.db)
        .append(&sku, AuditAction::PolicyUpdated, "replenishment policy upserted")
        .await?;

    Ok(Json(policy))
}

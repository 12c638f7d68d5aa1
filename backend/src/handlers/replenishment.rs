//! HTTP handlers for replenishment engine endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::replenishment::{ReplenishmentEvaluation, ReplenishmentService};
use crate::services::AutoReplenishScheduler;
use crate::AppState;
use shared::ProcurementProposal;

/// Input for a manual order; omit quantity to use the engine's number
#[derive(Debug, Default, Deserialize)]
pub struct ManualOrderInput {
    pub quantity: Option<i64>,
}

/// Result of an operator-triggered scheduler pass
#[derive(Debug, Serialize)]
pub struct SchedulerRunResult {
    pub minute: String,
    pub proposals_created: u32,
}

/// Run the policy engine read-only for a SKU
pub async fn evaluate_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ReplenishmentEvaluation>> {
    let service = ReplenishmentService::new(state.db, state.config.clone());
    let evaluation = service.evaluate(&sku).await?;
    Ok(Json(evaluation))
}

/// Create a manual procurement proposal for a SKU
pub async fn create_manual_order(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(input): Json<ManualOrderInput>,
) -> AppResult<Json<ProcurementProposal>> {
    let service = ReplenishmentService::new(state.db, state.config.clone());
    let proposal = service.manual_order(&sku, input.quantity).await?;
    Ok(Json(proposal))
}

/// Run one auto-replenishment pass now, on the same code path as the
/// recurring timer tick
pub async fn run_scheduler_pass(
    State(state): State<AppState>,
) -> AppResult<Json<SchedulerRunResult>> {
    let minute = chrono::Local::now().format("%H:%M").to_string();
    let scheduler = AutoReplenishScheduler::new(state);
    let proposals_created = scheduler.tick(&minute).await?;
    Ok(Json(SchedulerRunResult {
        minute,
        proposals_created,
    }))
}

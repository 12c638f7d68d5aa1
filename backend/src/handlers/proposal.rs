//! HTTP handlers for procurement proposal endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::ProcurementProposal;
use crate::services::ProposalService;
use crate::AppState;

/// Filter parameters for proposal listing
#[derive(Debug, Deserialize)]
pub struct ProposalFilter {
    pub sku: Option<String>,
    pub limit: Option<i64>,
}

/// List procurement proposals, newest first
pub async fn list_proposals(
    State(state): State<AppState>,
    Query(filter): Query<ProposalFilter>,
) -> AppResult<Json<Vec<ProcurementProposal>>> {
    let service = ProposalService::new(state.db);
    let proposals = service
        .list(filter.sku.as_deref(), filter.limit.unwrap_or(50))
        .await?;
    Ok(Json(proposals))
}

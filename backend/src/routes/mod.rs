//! Route definitions for the Inventory Procurement Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Demand forecasts
        .nest("/forecasts", forecast_routes())
        // Replenishment policies
        .nest("/policies", policy_routes())
        // Replenishment engine
        .nest("/replenishment", replenishment_routes())
        // Procurement proposals
        .nest("/proposals", proposal_routes())
        // Inbound batches
        .nest("/inbound", inbound_routes())
        // Audit trail
        .nest("/audit", audit_routes())
}

/// Demand forecast routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/:sku", get(handlers::get_sku_forecast))
        .route("/:sku/daily/:year_month", get(handlers::get_daily_breakdown))
}

/// Replenishment policy routes
fn policy_routes() -> Router<AppState> {
    Router::new().route(
        "/:sku",
        get(handlers::get_policy).put(handlers::upsert_policy),
    )
}

/// Replenishment engine routes
fn replenishment_routes() -> Router<AppState> {
    Router::new()
        .route("/run", post(handlers::run_scheduler_pass))
        .route("/:sku/evaluate", post(handlers::evaluate_sku))
        .route("/:sku/order", post(handlers::create_manual_order))
}

/// Procurement proposal routes
fn proposal_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_proposals))
}

/// Inbound batch routes
fn inbound_routes() -> Router<AppState> {
    Router::new().route("/:sku", get(handlers::get_pending_inbound))
}

/// Audit trail routes
fn audit_routes() -> Router<AppState> {
    Router::new().route("/:sku", get(handlers::get_audit_trail))
}

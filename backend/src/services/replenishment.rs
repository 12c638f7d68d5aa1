//! Replenishment policy engine service
//!
//! Runs the reorder evaluation both read-only (for display) and with
//! side effects (proposal + audit + alert) for the scheduler and the
//! manual order flow. Procurement correctness outranks notification
//! delivery: a failed alert is recorded on the proposal, never rolled
//! back.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{
    AuditService, ForecastService, NotificationService, PolicyService, ProposalService,
    StockService,
};
use shared::{
    compute_replenishment, AuditAction, NotificationStatus, PricingSnapshot,
    ProcurementProposal, ProposalSource, ReplenishmentComputation, ReplenishmentInputs,
};

/// Replenishment decision engine
#[derive(Clone)]
pub struct ReplenishmentService {
    db: PgPool,
    config: Arc<Config>,
}

/// One policy-engine evaluation for a SKU
#[derive(Debug, Clone, Serialize)]
pub struct ReplenishmentEvaluation {
    pub sku: String,
    pub on_hand: i64,
    pub in_transit: i64,
    pub effective_stock: i64,
    pub monthly_forecast: i64,
    pub computation: ReplenishmentComputation,
    pub pricing: Option<PricingSnapshot>,
}

impl ReplenishmentService {
    /// Create a new ReplenishmentService instance
    pub fn new(db: PgPool, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Read-only policy-engine run for a SKU: no proposal, no audit
    /// entry, no alert
    pub async fn evaluate(&self, sku: &str) -> AppResult<ReplenishmentEvaluation> {
        let policy = PolicyService::new(self.db.clone())
            .get_or_default(sku)
            .await?;
        let stock = StockService::new(self.db.clone());

        let on_hand = stock.on_hand(sku).await?;
        let in_transit = stock.pending_total(sku).await?;
        let effective_stock = on_hand + in_transit;

        let monthly_forecast = ForecastService::new(self.db.clone())
            .current_month_forecast(sku, &policy)
            .await?;

        let computation = compute_replenishment(&ReplenishmentInputs {
            monthly_forecast,
            effective_stock,
            safety_stock_days: policy.safety_stock_days,
            economic_order_qty: policy.economic_order_qty,
            lead_time_mode: policy.lead_time_mode,
        });

        Ok(ReplenishmentEvaluation {
            sku: sku.to_string(),
            on_hand,
            in_transit,
            effective_stock,
            monthly_forecast,
            computation,
            pricing: policy.supplier_pricing.as_ref().map(|p| p.snapshot()),
        })
    }

    /// Evaluate a SKU and, when the reorder condition holds, create a
    /// proposal with audit trail and alert. Returns None when the
    /// engine decided not to order.
    pub async fn trigger(
        &self,
        sku: &str,
        source: ProposalSource,
    ) -> AppResult<Option<ProcurementProposal>> {
        let evaluation = self.evaluate(sku).await?;
        if !evaluation.computation.should_trigger {
            return Ok(None);
        }

        let proposal = self
            .create_proposal(&evaluation, evaluation.computation.order_qty, source)
            .await?;
        Ok(Some(proposal))
    }

    /// Create a proposal at the operator's request, using the engine's
    /// order quantity unless an explicit quantity is given. Manual
    /// orders do not require the trigger condition to hold.
    pub async fn manual_order(
        &self,
        sku: &str,
        quantity: Option<i64>,
    ) -> AppResult<ProcurementProposal> {
        let evaluation = self.evaluate(sku).await?;
        let quantity = quantity.unwrap_or(evaluation.computation.order_qty);
        if quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Order quantity must be positive".to_string(),
            });
        }
        self.create_proposal(&evaluation, quantity, ProposalSource::Manual)
            .await
    }

    /// Persist the proposal, append the audit entry and attempt the
    /// alert, recording its outcome on the proposal
    async fn create_proposal(
        &self,
        evaluation: &ReplenishmentEvaluation,
        quantity: i64,
        source: ProposalSource,
    ) -> AppResult<ProcurementProposal> {
        let proposals = ProposalService::new(self.db.clone());
        let mut proposal = proposals
            .create(&evaluation.sku, quantity, evaluation.pricing.as_ref(), source)
            .await?;

        let action = match source {
            ProposalSource::Auto => AuditAction::AutoReplenishTriggered,
            ProposalSource::Manual => AuditAction::ManualOrderCreated,
        };
        AuditService::new(self.db.clone())
            .append(
                &evaluation.sku,
                action,
                &format!(
                    "effective stock {} against dynamic reorder point {:.1}; proposed {} units",
                    evaluation.effective_stock,
                    evaluation.computation.dynamic_reorder_point,
                    quantity
                ),
            )
            .await?;

        let notifier = NotificationService::new(self.db.clone(), self.config.clone());
        let status = if !notifier.is_configured() {
            NotificationStatus::Skipped
        } else {
            match notifier
                .send_procurement_alert(&self.config.notification.recipients, &proposal)
                .await
            {
                Ok(()) => NotificationStatus::Sent,
                Err(err) => {
                    tracing::warn!("Procurement alert for {} failed: {}", evaluation.sku, err);
                    NotificationStatus::Failed
                }
            }
        };
        proposals.mark_notification(proposal.id, status).await?;
        proposal.notification_status = status;

        Ok(proposal)
    }
}

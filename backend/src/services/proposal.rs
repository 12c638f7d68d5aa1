//! Procurement proposal store
//!
//! Proposals are immutable after creation apart from the notification
//! outcome field; conversion or cancellation belongs to the external
//! procurement workflow.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    NotificationStatus, PricingSnapshot, ProcurementProposal, ProposalSource,
};

/// Store for procurement proposals
#[derive(Clone)]
pub struct ProposalService {
    db: PgPool,
}

/// Database row for a proposal
#[derive(Debug, sqlx::FromRow)]
struct ProposalRow {
    id: Uuid,
    sku: String,
    quantity: i64,
    supplier_snapshot: Option<serde_json::Value>,
    order_date: NaiveDate,
    source: String,
    notification_status: String,
    created_at: DateTime<Utc>,
}

impl From<ProposalRow> for ProcurementProposal {
    fn from(row: ProposalRow) -> Self {
        let supplier_snapshot = row
            .supplier_snapshot
            .and_then(|v| serde_json::from_value::<PricingSnapshot>(v).ok());

        ProcurementProposal {
            id: row.id,
            sku: row.sku,
            quantity: row.quantity,
            supplier_snapshot,
            order_date: row.order_date,
            source: ProposalSource::from_str_or_manual(&row.source),
            notification_status: NotificationStatus::from_str_or_pending(
                &row.notification_status,
            ),
            created_at: row.created_at,
        }
    }
}

const PROPOSAL_COLUMNS: &str = "id, sku, quantity, supplier_snapshot, order_date, \
                                source, notification_status, created_at";

impl ProposalService {
    /// Create a new ProposalService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist a new proposal
    pub async fn create(
        &self,
        sku: &str,
        quantity: i64,
        supplier_snapshot: Option<&PricingSnapshot>,
        source: ProposalSource,
    ) -> AppResult<ProcurementProposal> {
        if quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Proposal quantity must be positive".to_string(),
            });
        }

        let snapshot_json = supplier_snapshot
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let row = sqlx::query_as::<_, ProposalRow>(&format!(
            r#"
            INSERT INTO procurement_proposals (sku, quantity, supplier_snapshot, source)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROPOSAL_COLUMNS}
            "#,
        ))
        .bind(sku)
        .bind(quantity)
        .bind(&snapshot_json)
        .bind(source.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// AUTO-sourced proposals for a SKU created at or after `since`.
    /// This lookback is the scheduler's cool-down idempotency guard.
    pub async fn recent_auto(
        &self,
        sku: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<ProcurementProposal>> {
        let rows = sqlx::query_as::<_, ProposalRow>(&format!(
            r#"
            SELECT {PROPOSAL_COLUMNS}
            FROM procurement_proposals
            WHERE sku = $1 AND source = 'auto' AND created_at >= $2
            ORDER BY created_at DESC
            "#,
        ))
        .bind(sku)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    /// Record the notification outcome for a proposal
    pub async fn mark_notification(
        &self,
        proposal_id: Uuid,
        status: NotificationStatus,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE procurement_proposals SET notification_status = $2 WHERE id = $1",
        )
        .bind(proposal_id)
        .bind(status.as_str())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Proposal".to_string()));
        }

        Ok(())
    }

    /// List proposals, optionally restricted to one SKU, newest first
    pub async fn list(
        &self,
        sku: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<ProcurementProposal>> {
        let rows = match sku {
            Some(sku) => {
                sqlx::query_as::<_, ProposalRow>(&format!(
                    r#"
                    SELECT {PROPOSAL_COLUMNS}
                    FROM procurement_proposals
                    WHERE sku = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                ))
                .bind(sku)
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProposalRow>(&format!(
                    r#"
                    SELECT {PROPOSAL_COLUMNS}
                    FROM procurement_proposals
                    ORDER BY created_at DESC
                    LIMIT $1
                    "#,
                ))
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }
}

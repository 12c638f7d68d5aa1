//! Stock level and inbound batch read service

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{BatchStatus, InboundBatch};

/// Read-side service over on-hand stock and inbound batches
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Row for inbound batch queries
#[derive(Debug, sqlx::FromRow)]
struct InboundRow {
    id: Uuid,
    sku: String,
    arrival_date: NaiveDate,
    quantity: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<InboundRow> for InboundBatch {
    fn from(row: InboundRow) -> Self {
        InboundBatch {
            id: row.id,
            sku: row.sku,
            arrival_date: row.arrival_date,
            quantity: row.quantity,
            status: BatchStatus::from_str_or_received(&row.status),
            created_at: row.created_at,
        }
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Present on-hand quantity for a SKU; an absent row means zero
    pub async fn on_hand(&self, sku: &str) -> AppResult<i64> {
        let on_hand = sqlx::query_scalar::<_, i64>(
            "SELECT on_hand FROM stock_levels WHERE sku = $1",
        )
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(on_hand.unwrap_or(0))
    }

    /// Pending inbound batches for a SKU, earliest arrival first
    pub async fn pending_batches(&self, sku: &str) -> AppResult<Vec<InboundBatch>> {
        let rows = sqlx::query_as::<_, InboundRow>(
            r#"
            SELECT id, sku, arrival_date, quantity, status, created_at
            FROM inbound_batches
            WHERE sku = $1 AND status = 'pending'
            ORDER BY arrival_date ASC, created_at ASC
            "#,
        )
        .bind(sku)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    /// Total pending inbound quantity for a SKU
    pub async fn pending_total(&self, sku: &str) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::bigint
            FROM inbound_batches
            WHERE sku = $1 AND status = 'pending'
            "#,
        )
        .bind(sku)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }
}

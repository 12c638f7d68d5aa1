//! Audit log sink
//!
//! Write-once, append-only; the policy engine records every triggered
//! decision here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{AuditAction, AuditEntry};

/// Append-only audit trail service
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

/// Database row for an audit entry
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    sku: String,
    action_type: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        AuditEntry {
            id: row.id,
            sku: row.sku,
            action_type: AuditAction::from_str_or_policy(&row.action_type),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append an entry to the audit trail
    pub async fn append(
        &self,
        sku: &str,
        action_type: AuditAction,
        content: &str,
    ) -> AppResult<AuditEntry> {
        let row = sqlx::query_as::<_, AuditRow>(
            r#"
            INSERT INTO audit_log (sku, action_type, content)
            VALUES ($1, $2, $3)
            RETURNING id, sku, action_type, content, created_at
            "#,
        )
        .bind(sku)
        .bind(action_type.as_str())
        .bind(content)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Audit trail for a SKU, newest first
    pub async fn list(&self, sku: &str, limit: i64) -> AppResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, sku, action_type, content, created_at
            FROM audit_log
            WHERE sku = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(sku)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }
}

//! Audit log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actions the engine records in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AutoReplenishTriggered,
    ManualOrderCreated,
    PolicyUpdated,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AutoReplenishTriggered => "auto_replenish_triggered",
            AuditAction::ManualOrderCreated => "manual_order_created",
            AuditAction::PolicyUpdated => "policy_updated",
        }
    }

    pub fn from_str_or_policy(s: &str) -> Self {
        match s {
            "auto_replenish_triggered" => AuditAction::AutoReplenishTriggered,
            "manual_order_created" => AuditAction::ManualOrderCreated,
            _ => AuditAction::PolicyUpdated,
        }
    }
}

/// Write-once audit record produced on every triggered decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub sku: String,
    pub action_type: AuditAction,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

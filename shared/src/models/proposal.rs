//! Procurement proposal models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PricingSnapshot;

/// How a proposal came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSource {
    Manual,
    Auto,
}

impl ProposalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalSource::Manual => "manual",
            ProposalSource::Auto => "auto",
        }
    }

    pub fn from_str_or_manual(s: &str) -> Self {
        match s {
            "auto" => ProposalSource::Auto,
            _ => ProposalSource::Manual,
        }
    }
}

/// Outcome of the alert attempted for a proposal.
///
/// Notification delivery never blocks or reverses proposal creation;
/// this field only records what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
    Skipped,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
            NotificationStatus::Skipped => "skipped",
        }
    }

    pub fn from_str_or_pending(s: &str) -> Self {
        match s {
            "sent" => NotificationStatus::Sent,
            "failed" => NotificationStatus::Failed,
            "skipped" => NotificationStatus::Skipped,
            _ => NotificationStatus::Pending,
        }
    }
}

/// A procurement proposal created by the replenishment engine.
///
/// Immutable after creation; conversion into an actual purchase order or
/// cancellation is the procurement workflow's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementProposal {
    pub id: Uuid,
    pub sku: String,
    pub quantity: i64,
    pub supplier_snapshot: Option<PricingSnapshot>,
    pub order_date: NaiveDate,
    pub source: ProposalSource,
    pub notification_status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

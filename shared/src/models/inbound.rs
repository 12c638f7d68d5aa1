//! Inbound batch models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed purchase that has not necessarily arrived yet.
///
/// The pending -> received transition is terminal; only pending batches
/// feed the stock simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundBatch {
    pub id: Uuid,
    pub sku: String,
    pub arrival_date: NaiveDate,
    pub quantity: i64,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an inbound batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Received,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Received => "received",
        }
    }

    /// Forgiving mapping from the stored string; unknown values are
    /// treated as received so they never inflate the simulation.
    pub fn from_str_or_received(s: &str) -> Self {
        match s {
            "pending" => BatchStatus::Pending,
            _ => BatchStatus::Received,
        }
    }
}

//! Procurement alert notifications
//!
//! Delivery is fire-and-forget from the engine's perspective: the caller
//! records the outcome on the proposal and never unwinds procurement
//! state when a send fails. Every attempt lands in the notification log.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use shared::ProcurementProposal;

/// Notification service for procurement alerts
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    config: Arc<Config>,
}

/// Payload POSTed to the configured alert webhook
#[derive(Debug, Serialize)]
struct AlertPayload<'a> {
    recipients: &'a [String],
    subject: String,
    body: String,
    sku: &'a str,
    proposal_id: Uuid,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Whether alert delivery is configured at all
    pub fn is_configured(&self) -> bool {
        self.config.notification.webhook_url.is_some()
    }

    /// Send a procurement alert for a proposal.
    ///
    /// Errors are returned as strings for the caller to record; they
    /// must never abort or roll back the proposal that triggered them.
    pub async fn send_procurement_alert(
        &self,
        recipients: &[String],
        proposal: &ProcurementProposal,
    ) -> Result<(), String> {
        let subject = format!("Procurement proposal created for {}", proposal.sku);
        let body = format!(
            "Proposed {} units of {} ({} order, {}).",
            proposal.quantity,
            proposal.sku,
            proposal.source.as_str(),
            proposal
                .supplier_snapshot
                .as_ref()
                .map(|s| format!("supplier {}", s.supplier_code))
                .unwrap_or_else(|| "no supplier pricing".to_string()),
        );

        let result = match &self.config.notification.webhook_url {
            Some(url) => {
                let payload = AlertPayload {
                    recipients,
                    subject: subject.clone(),
                    body,
                    sku: &proposal.sku,
                    proposal_id: proposal.id,
                };
                let client = reqwest::Client::new();
                match client.post(url).json(&payload).send().await {
                    Ok(response) if response.status().is_success() => Ok(()),
                    Ok(response) => Err(format!("alert webhook returned {}", response.status())),
                    Err(e) => Err(format!("alert webhook request failed: {}", e)),
                }
            }
            None => Err("no alert webhook configured".to_string()),
        };

        self.log_attempt(&proposal.sku, recipients, &subject, &result)
            .await;

        result
    }

    /// Record the delivery attempt; a logging failure is reported but
    /// never masks the send result
    async fn log_attempt(
        &self,
        sku: &str,
        recipients: &[String],
        subject: &str,
        result: &Result<(), String>,
    ) {
        let (status, error_message) = match result {
            Ok(()) => ("sent", None),
            Err(e) => ("failed", Some(e.clone())),
        };

        let logged = sqlx::query(
            r#"
            INSERT INTO notification_log (sku, recipients, subject, status, error_message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(sku)
        .bind(recipients)
        .bind(subject)
        .bind(status)
        .bind(&error_message)
        .execute(&self.db)
        .await;

        if let Err(e) = logged {
            tracing::error!("Failed to record notification attempt for {}: {}", sku, e);
        }
    }
}

//! Owner notifications.
//!
//! Delivery itself (email, push) lives behind [`NotificationGateway`]. Sending
//! is fire-and-forget: failures are logged and never reach the caller.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ReactionSeverity, RiskLevel};

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Alert raised when a check comes back high or critical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionAlert {
    pub owner_id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub risk_level: RiskLevel,
    /// Toxic medication names, then "drug1 + drug2" for each serious pair
    pub subjects: Vec<String>,
    pub checked_at: String,
}

/// Alert raised when an adverse reaction is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionAlert {
    pub owner_id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub medication: String,
    pub severity: ReactionSeverity,
    pub symptoms: Vec<String>,
}

/// Any alert the gateway can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Interaction(InteractionAlert),
    AdverseReaction(ReactionAlert),
}

/// Outbound notification channel.
pub trait NotificationGateway: Send + Sync {
    fn send(&self, notification: &Notification) -> NotifyResult<()>;
}

/// Send a notification, logging and swallowing any failure.
///
/// Returns whether delivery succeeded.
pub fn dispatch(gateway: &dyn NotificationGateway, notification: &Notification) -> bool {
    match gateway.send(notification) {
        Ok(()) => true,
        Err(e) => {
            let (kind, pet_id) = match notification {
                Notification::Interaction(alert) => ("interaction", alert.pet_id.as_str()),
                Notification::AdverseReaction(alert) => ("adverse_reaction", alert.pet_id.as_str()),
            };
            tracing::warn!(kind, pet_id, error = %e, "Failed to send notification");
            false
        }
    }
}

/// Gateway that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationGateway for TracingNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        match notification {
            Notification::Interaction(alert) => tracing::info!(
                owner_id = %alert.owner_id,
                pet_id = %alert.pet_id,
                risk = %alert.risk_level,
                subjects = ?alert.subjects,
                "Medication safety alert"
            ),
            Notification::AdverseReaction(alert) => tracing::info!(
                owner_id = %alert.owner_id,
                pet_id = %alert.pet_id,
                medication = %alert.medication,
                severity = %alert.severity,
                "Adverse reaction alert"
            ),
        }
        Ok(())
    }
}

/// Gateway that keeps notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationGateway for MemoryNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}

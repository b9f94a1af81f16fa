//! Best-effort notifications about new reservations.
//!
//! A failed notification is logged and dropped; it never changes the response
//! the submitter sees.

mod discord;

pub use discord::*;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::Reservation;

/// Errors raised while delivering a notification.
#[derive(Debug)]
pub enum NotifyError {
    /// The webhook could not be reached.
    Transport(String),
    /// The webhook answered with a non-success status.
    Rejected(u16),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Transport(message) => write!(f, "webhook request failed: {}", message),
            NotifyError::Rejected(status) => write!(f, "webhook returned status {}", status),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Something that can be told about a new reservation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn reservation_created(&self, reservation: &Reservation) -> Result<(), NotifyError>;
}

/// Used when no webhook URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn reservation_created(&self, _reservation: &Reservation) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Deliver a notification, logging and swallowing any failure.
pub async fn notify_best_effort(notifier: &dyn Notifier, reservation: &Reservation) {
    if let Err(error) = notifier.reservation_created(reservation).await {
        let error = AppError::from(error);
        tracing::warn!(
            reservation_id = reservation.id,
            error = %error,
            "Reservation notification failed"
        );
    }
}

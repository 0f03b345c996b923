//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// The event class that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_event", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A request was created near the recipient.
    NearbyRequest,
    /// A donor responded to the recipient's request.
    DonorResponse,
    /// A donation by the recipient was confirmed.
    DonationConfirmed,
}

impl NotificationEvent {
    /// Return the event as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearbyRequest => "nearby_request",
            Self::DonorResponse => "donor_response",
            Self::DonationConfirmed => "donation_confirmed",
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted notification.
///
/// Created exactly once per event; mutated only to flip `is_read`;
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub recipient_id: Uuid,
    /// The user whose action triggered the notification.
    pub actor_id: Uuid,
    /// The blood request the event concerns.
    pub request_id: Uuid,
    /// Event class.
    pub event: NotificationEvent,
    /// Human-readable message.
    pub message: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

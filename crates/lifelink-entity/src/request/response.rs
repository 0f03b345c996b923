//! Donor response entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A donor's response to a blood request.
///
/// Immutable history: once appended, a response is never updated or
/// deleted. Uniqueness of `(request_id, donor_id)` is enforced by the
/// database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestResponse {
    /// Unique response identifier.
    pub id: Uuid,
    /// The request being responded to.
    pub request_id: Uuid,
    /// The responding donor.
    pub donor_id: Uuid,
    /// Free-text message from the donor.
    pub message: Option<String>,
    /// Whether the donor states they can donate.
    pub can_donate: bool,
    /// When the response was recorded.
    pub created_at: DateTime<Utc>,
}

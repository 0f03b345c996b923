//! Fulfillment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded donation against a blood request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fulfillment {
    /// Unique fulfillment identifier.
    pub id: Uuid,
    /// The request being fulfilled.
    pub request_id: Uuid,
    /// The donor who provided the units.
    pub donor_id: Uuid,
    /// Number of units provided. Always positive.
    pub units_provided: i32,
    /// When the fulfillment was recorded.
    pub created_at: DateTime<Utc>,
}

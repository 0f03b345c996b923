//! Blood request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lifelink_core::types::geo::GeoPoint;

use crate::user::blood_group::BloodGroup;
use crate::user::model::UserSummary;

use super::fulfillment::Fulfillment;
use super::response::RequestResponse;
use super::status::RequestStatus;
use super::urgency::UrgencyLevel;

/// A blood request as stored in the `blood_requests` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BloodRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The user who created the request. Owns all mutations except
    /// administrative override.
    pub requester_id: Uuid,
    /// Name of the patient the blood is for.
    pub patient_name: String,
    /// Required blood group.
    pub blood_group: BloodGroup,
    /// Urgency of the need.
    pub urgency: UrgencyLevel,
    /// Number of units needed. Always positive.
    pub units_needed: i32,
    /// Contact details for coordinating the donation.
    pub contact: String,
    /// Latitude of the request location.
    pub latitude: f64,
    /// Longitude of the request location.
    pub longitude: f64,
    /// Free-text address.
    pub address: String,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    /// The request location as a geographic point.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// A blood request together with its populated sub-collections.
///
/// This is the shape the API returns: the row itself plus the requester
/// summary, the ordered response history, and the ordered fulfillment
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequestDetail {
    /// The request row.
    #[serde(flatten)]
    pub request: BloodRequest,
    /// Populated requester reference.
    pub requester: UserSummary,
    /// Donor responses, oldest first.
    pub responses: Vec<RequestResponse>,
    /// Recorded fulfillments, oldest first.
    pub fulfillments: Vec<Fulfillment>,
}

impl BloodRequestDetail {
    /// Total units provided across all fulfillments.
    pub fn units_provided(&self) -> i64 {
        self.fulfillments
            .iter()
            .map(|f| f.units_provided as i64)
            .sum()
    }
}

/// Data required to create a new blood request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBloodRequest {
    /// Name of the patient.
    pub patient_name: String,
    /// Required blood group.
    pub blood_group: BloodGroup,
    /// Urgency of the need.
    pub urgency: UrgencyLevel,
    /// Number of units needed.
    pub units_needed: i32,
    /// Contact details.
    pub contact: String,
    /// Latitude of the request location.
    pub latitude: f64,
    /// Longitude of the request location.
    pub longitude: f64,
    /// Free-text address.
    pub address: String,
}

//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use lifelink_entity::request::{RequestStatus, UrgencyLevel};
use lifelink_entity::user::BloodGroup;

/// Location payload shared by registration and request creation.
///
/// Coordinates are `[longitude, latitude]`, GeoJSON order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationPayload {
    /// `[longitude, latitude]` pair.
    #[validate(length(min = 2, max = 2, message = "must be a [longitude, latitude] pair"))]
    pub coordinates: Vec<f64>,
    /// Free-text address.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
}

impl LocationPayload {
    /// Longitude component.
    pub fn longitude(&self) -> f64 {
        self.coordinates.first().copied().unwrap_or(f64::NAN)
    }

    /// Latitude component.
    pub fn latitude(&self) -> f64 {
        self.coordinates.get(1).copied().unwrap_or(f64::NAN)
    }
}

/// POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 32, message = "must be 3-32 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password; hashed before storage.
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Registered location.
    #[validate(nested)]
    pub location: LocationPayload,
    /// Whether the user registers as a donor.
    #[serde(default)]
    pub is_donor: bool,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email address.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// POST /api/blood-requests
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequestPayload {
    /// Name of the patient the blood is for.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub patient_name: String,
    /// Required blood group.
    pub blood_group: BloodGroup,
    /// Urgency of the need.
    pub urgency: UrgencyLevel,
    /// Number of units needed.
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub units_needed: i32,
    /// Contact details for coordinating the donation.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub contact: String,
    /// Request location.
    #[validate(nested)]
    pub location: LocationPayload,
}

/// POST /api/blood-requests/{id}/respond
#[derive(Debug, Clone, Deserialize)]
pub struct RespondPayload {
    /// Free-text message from the donor.
    pub message: Option<String>,
    /// Whether the donor states they can donate.
    #[serde(default = "default_true")]
    pub can_donate: bool,
}

fn default_true() -> bool {
    true
}

/// POST /api/blood-requests/{id}/fulfill
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FulfillPayload {
    /// The donor whose donation is being recorded.
    pub donor_id: Uuid,
    /// Units provided by the donor.
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub units_provided: i32,
}

/// PUT /api/blood-requests/{id}/status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusPayload {
    /// New canonical status value.
    pub status: RequestStatus,
}

/// PUT /api/users/me
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfilePayload {
    /// New phone number.
    pub phone: Option<String>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// New address.
    pub address: Option<String>,
    /// New donor flag.
    pub is_donor: Option<bool>,
    /// New availability flag.
    pub is_available: Option<bool>,
}

/// Query parameters for GET /api/blood-requests
#[derive(Debug, Clone, Deserialize)]
pub struct ListRequestsQuery {
    /// Restrict to a lifecycle state.
    pub status: Option<RequestStatus>,
    /// Restrict to a blood group.
    pub blood_group: Option<BloodGroup>,
    /// Restrict to an urgency level.
    pub urgency: Option<UrgencyLevel>,
    /// Restrict to requests created by this user.
    pub requester_id: Option<Uuid>,
    /// Substring match on patient name or address.
    pub search: Option<String>,
    /// Center latitude for a radius filter.
    pub latitude: Option<f64>,
    /// Center longitude for a radius filter.
    pub longitude: Option<f64>,
    /// Radius in kilometers around the center.
    pub radius_km: Option<f64>,
}

/// Query parameters for GET /api/donors/nearby
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyDonorsQuery {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Radius in kilometers; server default applies when absent.
    pub radius_km: Option<f64>,
    /// Blood group to match.
    pub blood_group: BloodGroup,
}

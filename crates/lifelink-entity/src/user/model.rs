//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lifelink_core::types::geo::GeoPoint;

use super::blood_group::BloodGroup;
use super::role::UserRole;

/// A registered user in the LifeLink system.
///
/// Every user may act as a requester; those with `is_donor` set are
/// additionally candidates for proximity matching.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// User role.
    pub role: UserRole,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Latitude of the user's registered location.
    pub latitude: f64,
    /// Longitude of the user's registered location.
    pub longitude: f64,
    /// Free-text address.
    pub address: Option<String>,
    /// Whether the user is registered as a donor.
    pub is_donor: bool,
    /// Whether the donor is currently available for matching.
    pub is_available: bool,
    /// Number of completed donations. Monotonically non-decreasing.
    pub donation_count: i32,
    /// Badge names derived from `donation_count`. Recomputed wholesale
    /// on every change to the count.
    pub badges: Vec<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user's registered location as a geographic point.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this user is currently matchable as a donor.
    pub fn is_matchable(&self) -> bool {
        self.is_donor && self.is_available
    }
}

/// Compact user reference embedded in populated API responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User identifier.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Contact phone number.
    pub phone: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            blood_group: user.blood_group,
            phone: user.phone.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Latitude of the registered location.
    pub latitude: f64,
    /// Longitude of the registered location.
    pub longitude: f64,
    /// Free-text address.
    pub address: Option<String>,
    /// Whether the user registers as a donor.
    pub is_donor: bool,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
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

//! Donor matching service.
//!
//! The repository supplies candidates from a bounding-box prefilter over
//! the indexed coordinate columns; this service applies the exact
//! haversine distance, drops candidates outside the radius, and ranks the
//! rest nearest-first.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use lifelink_core::config::MatchingConfig;
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::GeoPoint;
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::user::{BloodGroup, User};

/// A donor matched to a request, with the computed distance.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedDonor {
    /// The matched donor.
    pub donor: User,
    /// Great-circle distance from the request location in kilometers.
    pub distance_km: f64,
}

/// Finds available donors near a point.
#[derive(Debug, Clone)]
pub struct MatchingService {
    user_repo: Arc<UserRepository>,
    config: MatchingConfig,
}

impl MatchingService {
    /// Creates a new matching service.
    pub fn new(user_repo: Arc<UserRepository>, config: MatchingConfig) -> Self {
        Self { user_repo, config }
    }

    /// The configured default search radius in kilometers.
    pub fn default_radius_km(&self) -> f64 {
        self.config.default_radius_km
    }

    /// Available donors of the given blood group within `radius_km` of
    /// `center`, excluding `exclude`, nearest first.
    ///
    /// The radius is clamped to the configured maximum and the result is
    /// capped at the configured match limit.
    pub async fn find_nearby_donors(
        &self,
        center: GeoPoint,
        radius_km: Option<f64>,
        blood_group: BloodGroup,
        exclude: Uuid,
    ) -> AppResult<Vec<MatchedDonor>> {
        let radius_km = radius_km
            .unwrap_or(self.config.default_radius_km)
            .clamp(0.0, self.config.max_radius_km);

        let candidates = self
            .user_repo
            .find_nearby_donors(
                &center.bounding_box(radius_km),
                blood_group,
                exclude,
                self.config.max_matches as i64 * 4,
            )
            .await?;

        let mut matched: Vec<MatchedDonor> = candidates
            .into_iter()
            .map(|donor| {
                let distance_km = center.distance_km(&donor.location());
                MatchedDonor { donor, distance_km }
            })
            .filter(|m| m.distance_km <= radius_km)
            .collect();

        matched.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        matched.truncate(self.config.max_matches);

        debug!(
            blood_group = %blood_group,
            radius_km,
            matches = matched.len(),
            "Donor proximity query complete"
        );

        Ok(matched)
    }
}

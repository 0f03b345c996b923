//! Donor search handlers.

use axum::Json;
use axum::extract::{Query, State};

use lifelink_core::error::AppError;
use lifelink_core::types::geo::GeoPoint;

use crate::dto::request::NearbyDonorsQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/donors/nearby
///
/// The same geo layer that powers the creation fan-out, exposed as a
/// search surface. The caller is always excluded from the results.
pub async fn nearby_donors(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NearbyDonorsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let center = GeoPoint::new(query.longitude, query.latitude);
    if !center.is_valid() {
        return Err(AppError::validation(
            "latitude/longitude must be a valid coordinate pair",
        )
        .into());
    }

    let matches = state
        .matching_service
        .find_nearby_donors(center, query.radius_km, query.blood_group, auth.user_id)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": matches })))
}

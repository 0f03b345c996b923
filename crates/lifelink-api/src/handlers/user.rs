//! User profile handlers.

use axum::Json;
use axum::extract::State;

use lifelink_entity::user::model::UpdateUser;

use crate::dto::request::UpdateProfilePayload;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .user_service
        .update_profile(
            &auth,
            UpdateUser {
                phone: payload.phone,
                latitude: payload.latitude,
                longitude: payload.longitude,
                address: payload.address,
                is_donor: payload.is_donor,
                is_available: payload.is_available,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// GET /api/users/me/badges
pub async fn badges(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let badges = state.user_service.badges(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": badges })))
}

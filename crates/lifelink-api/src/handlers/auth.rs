//! Authentication handlers: register, login, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use lifelink_core::error::AppError;
use lifelink_entity::user::model::CreateUser;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::AuthResponse;
use crate::dto::validate_payload;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_payload(&req)?;

    let password_hash = state.password_hasher.hash_password(&req.password)?;

    let user = state
        .user_service
        .register(CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            phone: req.phone,
            blood_group: req.blood_group,
            latitude: req.location.latitude(),
            longitude: req.location.longitude(),
            address: Some(req.location.address),
            is_donor: req.is_donor,
        })
        .await?;

    let (access_token, expires_at) =
        state
            .jwt_encoder
            .generate_access_token(user.id, user.role, &user.username)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            expires_at,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate_payload(&req)?;

    // The identifier may be a username or an email address.
    let user = match state.user_repo.find_by_username(&req.username).await? {
        Some(user) => Some(user),
        None => state.user_repo.find_by_email(&req.username).await?,
    };

    let Some(user) = user else {
        return Err(AppError::unauthorized("Invalid username or password").into());
    };

    if !state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?
    {
        return Err(AppError::unauthorized("Invalid username or password").into());
    }

    let (access_token, expires_at) =
        state
            .jwt_encoder
            .generate_access_token(user.id, user.role, &user.username)?;

    Ok(Json(AuthResponse {
        access_token,
        expires_at,
        user,
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

//! User registration and profile management.

use std::sync::Arc;

use tracing::info;

use lifelink_core::error::AppError;
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::GeoPoint;
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::user::model::{CreateUser, UpdateUser};
use lifelink_entity::user::User;

use crate::context::RequestContext;

/// Manages user accounts and donor profiles.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Registers a new user. The password arrives pre-hashed.
    pub async fn register(&self, user: CreateUser) -> AppResult<User> {
        let location = GeoPoint::new(user.longitude, user.latitude);
        if !location.is_valid() {
            return Err(AppError::validation(
                "location coordinates must be a valid [longitude, latitude] pair",
            ));
        }

        if self
            .user_repo
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username is already taken"));
        }
        if self.user_repo.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let created = self.user_repo.create(&user).await?;
        info!(user_id = %created.id, username = %created.username, "User registered");
        Ok(created)
    }

    /// Loads the current user's full profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates profile fields (location, contact, donor availability).
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: UpdateUser,
    ) -> AppResult<User> {
        if let (Some(latitude), Some(longitude)) = (update.latitude, update.longitude) {
            if !GeoPoint::new(longitude, latitude).is_valid() {
                return Err(AppError::validation(
                    "location coordinates must be a valid [longitude, latitude] pair",
                ));
            }
        } else if update.latitude.is_some() != update.longitude.is_some() {
            return Err(AppError::validation(
                "latitude and longitude must be updated together",
            ));
        }

        self.user_repo
            .update_profile(ctx.user_id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// The current user's badge names, as derived from their donation count.
    pub async fn badges(&self, ctx: &RequestContext) -> AppResult<Vec<String>> {
        let user = self.get_profile(ctx).await?;
        Ok(user.badges)
    }
}

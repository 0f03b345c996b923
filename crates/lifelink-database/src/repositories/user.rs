//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use lifelink_core::error::{AppError, ErrorKind};
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::BoundingBox;
use lifelink_entity::user::model::{CreateUser, UpdateUser};
use lifelink_entity::user::{BloodGroup, User};

/// Repository for user CRUD and donor proximity queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Username and email uniqueness is enforced by
    /// the database; violations surface as Conflict.
    pub async fn create(&self, user: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, phone, blood_group, latitude, longitude, address, is_donor) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.blood_group)
        .bind(user.latitude)
        .bind(user.longitude)
        .bind(&user.address)
        .bind(user.is_donor)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Username or email is already registered")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create user", e)
            }
        })
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Update profile fields, leaving unset fields untouched.
    pub async fn update_profile(&self, id: Uuid, update: &UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                 phone = COALESCE($2, phone), \
                 latitude = COALESCE($3, latitude), \
                 longitude = COALESCE($4, longitude), \
                 address = COALESCE($5, address), \
                 is_donor = COALESCE($6, is_donor), \
                 is_available = COALESCE($7, is_available), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.phone)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(&update.address)
        .bind(update.is_donor)
        .bind(update.is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update profile", e))
    }

    /// Candidate donors inside a bounding box, matching blood group and
    /// availability, excluding the given identity.
    ///
    /// The box is a coarse prefilter over the indexed latitude/longitude
    /// columns; callers apply the exact haversine distance afterwards.
    /// Deliberately unpaginated.
    pub async fn find_nearby_donors(
        &self,
        bbox: &BoundingBox,
        blood_group: BloodGroup,
        exclude: Uuid,
        limit: i64,
    ) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE is_donor = TRUE \
               AND is_available = TRUE \
               AND blood_group = $1 \
               AND id <> $2 \
               AND latitude BETWEEN $3 AND $4 \
               AND longitude BETWEEN $5 AND $6 \
             LIMIT $7",
        )
        .bind(blood_group)
        .bind(exclude)
        .bind(bbox.min_latitude)
        .bind(bbox.max_latitude)
        .bind(bbox.min_longitude)
        .bind(bbox.max_longitude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query nearby donors", e))
    }
}

/// Whether a sqlx error is a Postgres unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use lifelink_auth::jwt::decoder::JwtDecoder;
use lifelink_auth::jwt::encoder::JwtEncoder;
use lifelink_auth::password::hasher::PasswordHasher;
use lifelink_core::config::AppConfig;
use lifelink_realtime::dispatcher::EventDispatcher;
use lifelink_realtime::server::RealtimeEngine;

use lifelink_database::repositories::blood_request::BloodRequestRepository;
use lifelink_database::repositories::notification::NotificationRepository;
use lifelink_database::repositories::user::UserRepository;

use lifelink_service::matching::MatchingService;
use lifelink_service::notification::NotificationService;
use lifelink_service::request::BloodRequestService;
use lifelink_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket engine
    pub realtime: Arc<RealtimeEngine>,
    /// Blood request event dispatcher
    pub dispatcher: Arc<EventDispatcher>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Blood request repository
    pub request_repo: Arc<BloodRequestRepository>,
    /// Notification repository
    pub notification_repo: Arc<NotificationRepository>,

    // ── Services ─────────────────────────────────────────────
    /// User service
    pub user_service: Arc<UserService>,
    /// Blood request lifecycle service
    pub request_service: Arc<BloodRequestService>,
    /// Donor matching service
    pub matching_service: Arc<MatchingService>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
}

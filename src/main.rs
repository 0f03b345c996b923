//! LifeLink Server — blood donor matching platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use lifelink_core::config::AppConfig;
use lifelink_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("LIFELINK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LifeLink v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db_pool = lifelink_database::connection::create_pool(&config.database).await?;
    lifelink_database::migration::run_migrations(&db_pool).await?;

    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(lifelink_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let request_repo = Arc::new(
        lifelink_database::repositories::blood_request::BloodRequestRepository::new(
            db_pool.clone(),
        ),
    );
    let notification_repo = Arc::new(
        lifelink_database::repositories::notification::NotificationRepository::new(
            db_pool.clone(),
        ),
    );

    // ── Auth ─────────────────────────────────────────────────────
    let password_hasher = Arc::new(lifelink_auth::password::hasher::PasswordHasher::new());
    let jwt_encoder = Arc::new(lifelink_auth::jwt::encoder::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(lifelink_auth::jwt::decoder::JwtDecoder::new(&config.auth));

    // ── Services ─────────────────────────────────────────────────
    let user_service = Arc::new(lifelink_service::user::UserService::new(Arc::clone(
        &user_repo,
    )));
    let request_service = Arc::new(lifelink_service::request::BloodRequestService::new(
        Arc::clone(&request_repo),
        Arc::clone(&user_repo),
    ));
    let matching_service = Arc::new(lifelink_service::matching::MatchingService::new(
        Arc::clone(&user_repo),
        config.matching.clone(),
    ));
    let notification_service = Arc::new(lifelink_service::notification::NotificationService::new(
        Arc::clone(&notification_repo),
    ));

    // ── Realtime engine + dispatcher ─────────────────────────────
    let realtime = Arc::new(lifelink_realtime::server::RealtimeEngine::new(
        &config.realtime,
    ));
    let dispatcher = Arc::new(lifelink_realtime::dispatcher::EventDispatcher::new(
        Arc::clone(&realtime.connections),
        Arc::clone(&notification_service),
    ));

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = lifelink_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_encoder,
        jwt_decoder,
        password_hasher,
        realtime,
        dispatcher,
        user_repo,
        request_repo,
        notification_repo,
        user_service,
        request_service,
        matching_service,
        notification_service,
    };

    let app = lifelink_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("LifeLink server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("LifeLink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

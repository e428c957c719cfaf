//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::clock::{Clock, SystemClock};
use signup::{
    NotificationQueue, PgSignupRepository, PurgeExpiredUseCase, RelayDispatcher, SignupConfig,
    TracingDispatcher, signup_router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Interval between passive purges of stale pending registrations
const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,signup=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = Arc::new(load_signup_config());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo = PgSignupRepository::new(pool.clone());

    // Startup cleanup: remove stale pending registrations
    // Errors here should not prevent server startup
    let purge = PurgeExpiredUseCase::new(Arc::new(repo.clone()), clock.clone(), config.clone());
    if let Err(e) = purge.execute().await {
        tracing::warn!(error = %e, "Pending registration cleanup failed, continuing anyway");
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = purge.execute().await {
                tracing::warn!(error = %e, "Periodic pending registration cleanup failed");
            }
        }
    });

    // Mail: relay when configured, log otherwise
    let queue = match env::var("MAIL_RELAY_URL") {
        Ok(url) if !url.trim().is_empty() => {
            tracing::info!(relay = %url, "Mail relay configured");
            NotificationQueue::spawn(
                Arc::new(RelayDispatcher::new(url.trim())?),
                config.notification_queue_capacity,
            )
        }
        _ => {
            tracing::warn!("MAIL_RELAY_URL not set, mail will only be logged");
            NotificationQueue::spawn(Arc::new(TracingDispatcher), config.notification_queue_capacity)
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    // Build router
    let app = Router::new()
        .nest(
            "/api/signup",
            signup_router(repo, queue.clone(), clock, config.as_ref().clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Give queued mail a chance to go out
    queue.flush().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Signup settings from the environment, falling back to defaults
fn load_signup_config() -> SignupConfig {
    let mut config = if cfg!(debug_assertions) {
        SignupConfig::development()
    } else {
        SignupConfig::default()
    };

    if let Ok(admin_email) = env::var("SIGNUP_ADMIN_EMAIL") {
        config.admin_email = admin_email;
    }
    if let Ok(locale) = env::var("SIGNUP_LOCALE") {
        config.locale_id = locale;
    }

    tracing::info!(
        admin_email = %config.admin_email,
        locale = %config.locale_id,
        "Signup configuration loaded"
    );

    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

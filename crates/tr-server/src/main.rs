//! Issue Tracker RS Server
//!
//! Serves the JSON API over PostgreSQL, or over the in-memory gateway when
//! configured to or when the database is unreachable. The in-memory gateway
//! takes its users from `TRACKER_SEED_USERS`.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tr_api::AppState;
use tr_auth::JwtService;
use tr_core::config::{AppConfig, StorageBackend};
use tr_db::{Database, DatabaseConfig, Store};

mod health;
mod seed;

use health::{HealthChecker, HealthConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        storage = ?config.storage,
        "Starting Issue Tracker RS"
    );

    let (store, db) = open_store(&config).await?;

    let mut health_checker = HealthChecker::new(HealthConfig::default());
    if let Some(ref db) = db {
        health_checker = health_checker.with_database(db.clone());
    }

    let state = AppState::new(store, JwtService::from_config(&config.auth));
    let timeout = Duration::from_secs(config.server.request_timeout_seconds);
    let app = build_router(state, Arc::new(health_checker), timeout);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging. `TRACKER_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tr_server=debug,tr_api=debug,tower_http=debug".into());
    let json = std::env::var("TRACKER_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

/// Pick the persistence gateway. PostgreSQL failures fall back to memory.
/// An unreadable seed file is fatal.
async fn open_store(config: &AppConfig) -> anyhow::Result<(Store, Option<Database>)> {
    if config.storage == StorageBackend::Memory {
        info!("Using in-memory storage");
        return memory_store(config);
    }

    let db = match Database::connect(&DatabaseConfig::from(&config.database)).await {
        Ok(db) => db,
        Err(e) => {
            warn!(
                "Failed to connect to database: {}. Falling back to in-memory storage.",
                e
            );
            return memory_store(config);
        }
    };

    if let Err(e) = db.bootstrap().await {
        warn!(
            "Failed to bootstrap schema: {}. Falling back to in-memory storage.",
            e
        );
        return memory_store(config);
    }

    info!("Connected to database");
    Ok((Store::postgres(&db), Some(db)))
}

fn memory_store(config: &AppConfig) -> anyhow::Result<(Store, Option<Database>)> {
    let memory = seed::seeded_memory_store(config.seed_users.as_deref())?;
    Ok((Store::memory(&memory), None))
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>, timeout: Duration) -> Router {
    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(tr_api::router().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

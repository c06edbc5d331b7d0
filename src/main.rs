//! Seatbook Server: office seat booking
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use seatbook_api::AppState;
use seatbook_auth::{IdentityProvider, JwksIdentityProvider};
use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
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

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SEATBOOK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Seatbook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Document store ───────────────────────────────────
    tracing::info!(backend = ?config.database.backend, "Opening document store...");
    let store = seatbook_database::open_store(&config.database).await?;
    store.health_check().await?;
    tracing::info!("Document store ready");

    // ── Step 2: Identity provider ────────────────────────────────
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(JwksIdentityProvider::from_config(&config.auth)?);
    tracing::info!(issuer = %config.auth.issuer, "Identity provider configured");

    // ── Step 3: Services + seat pool ─────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let cors = config.server.cors.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config, store, identity);
    let seeded = state
        .coordinator
        .registry()
        .initialize(state.config.seating.seat_count, state.config.seating.seat_price)
        .await?;
    tracing::info!(
        seeded,
        seat_count = state.config.seating.seat_count,
        "Seat pool initialized"
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = seatbook_api::build_app(state, &cors);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Seatbook server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = async move { server.await } => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = async move {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open connections");
        }
    }

    tracing::info!("Seatbook server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

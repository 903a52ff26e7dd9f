//! Todo API server.
//!
//! # Environment Variables
//!
//! - `TODO_API__DATABASE__URL`: PostgreSQL connection URL (required)
//! - `TODO_API__DATABASE__RUN_MIGRATIONS`: apply `migrations/` on startup
//! - `TODO_API__SERVER__HOST` / `TODO_API__SERVER__PORT`: bind address (default `0.0.0.0:3000`)
//! - `TODO_API__SERVER__ENVIRONMENT`: `development` (default) | `production` (JSON logs)
//! - `TODO_API__SERVER__LOG_LEVEL`: log filter, overridden by `RUST_LOG`

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_api::adapters::http::{app_router, TodoHandlers};
use todo_api::adapters::{
    ContextProvider, PgConnectionSource, PostgresTodoRepository, ScopedTransactionRunner,
};
use todo_api::config::{AppConfig, ConfigError, ServerConfig};
use todo_api::ports::TodoRepository;

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server);

    tracing::info!(environment = ?config.server.environment, "Starting todo API");

    let pool = match config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(error) => {
            tracing::error!(%error, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    if config.database.run_migrations {
        if let Err(error) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::error!(%error, "Failed to run migrations");
            std::process::exit(1);
        }
        tracing::info!("Migrations applied");
    }

    let provider = Arc::new(ContextProvider::new(PgConnectionSource::new(pool)));
    let repository: Arc<dyn TodoRepository> =
        Arc::new(PostgresTodoRepository::new(provider.clone()));
    let runner = Arc::new(ScopedTransactionRunner::new(provider.clone()));
    let app = app_router(provider, TodoHandlers::new(repository, runner));

    // Validated in load_config
    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(error) => {
            tracing::error!(%error, "Invalid bind address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "Listening");

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let json = server.is_production();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Completes on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}

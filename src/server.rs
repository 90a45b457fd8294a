//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, migrations and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::{FormRepository, TokenRepository};
use crate::infrastructure::persistence::{
    MemoryFormRepository, MemoryTokenRepository, PgFormRepository, PgTokenRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or in-memory storage when no
///   database is configured
/// - Services and shared state
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (form_repository, token_repository) = storage(&config).await?;

    let state = AppState::new(
        form_repository,
        token_repository,
        config.token_signing_secret.clone(),
        config.public_base_url.clone(),
        config.analytics_top_values,
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens a PostgreSQL pool with the configured limits and applies migrations.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

async fn storage(
    config: &Config,
) -> Result<(Arc<dyn FormRepository>, Arc<dyn TokenRepository>)> {
    match config.database_url {
        Some(ref url) => {
            let pool = Arc::new(connect_database(config, url).await?);
            Ok((
                Arc::new(PgFormRepository::new(pool.clone())),
                Arc::new(PgTokenRepository::new(pool)),
            ))
        }
        None => {
            tracing::warn!("No database configured, forms and tokens are kept in memory");
            Ok((
                Arc::new(MemoryFormRepository::new()),
                Arc::new(MemoryTokenRepository::new()),
            ))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}

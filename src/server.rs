//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::ClickService;
use crate::config::Config;
use crate::domain::click_worker::{ClickQueue, run_click_worker};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::cache::{LinkCache, MokaLinkCache, NullCache};
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
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
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Resolution cache (or NullCache when disabled)
/// - Background click worker
/// - Axum HTTP server
///
/// On Ctrl+C the server stops accepting requests, then the click worker
/// finishes the events already queued before this function returns.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache: Arc<dyn LinkCache> = if config.is_cache_enabled() {
        tracing::info!(capacity = config.cache_capacity, "Cache enabled (moka)");
        Arc::new(MokaLinkCache::new(config.cache_capacity))
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> =
        Arc::new(PgClickRepository::new(pool.clone()));

    let (click_queue, click_rx) = ClickQueue::bounded(config.click_queue_capacity);
    let click_service = Arc::new(ClickService::new(click_repository.clone()));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        click_service,
        config.click_worker_concurrency,
    ));

    let state = AppState::new(
        link_repository,
        click_repository,
        cache,
        click_queue,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it every queue sender) is gone; wait for the backlog.
    tracing::info!("Server stopped, draining click queue");
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }

    Ok(())
}

/// Builds the PostgreSQL pool from the `DB_*` pool settings.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

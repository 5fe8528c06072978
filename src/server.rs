//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations and the Axum server lifecycle.

use crate::config::{Config, mask_connection_string};
use crate::domain::repositories::LinkStore;
use crate::infrastructure::persistence::{MemoryLinkStore, PgLinkStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The link store (PostgreSQL with migrations, or in-memory)
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The database is unreachable and fallback is disabled
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "Link store ready");

    let state = AppState::new(store, config.base_url.clone(), config.behind_proxy);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
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

/// Selects the store backend.
///
/// With no database configured the in-memory store is used. A configured
/// database that cannot be reached falls back to memory when
/// `storage_fallback` is set; a failed migration is always fatal.
pub async fn open_store(config: &Config) -> Result<Arc<dyn LinkStore>> {
    let Some(ref database_url) = config.database_url else {
        tracing::warn!("No database configured; links will not survive a restart");
        return Ok(Arc::new(MemoryLinkStore::new()));
    };

    match PgLinkStore::connect(database_url, &config.pool_settings()).await {
        Ok(pool) => {
            tracing::info!("Connected to database");
            let store = PgLinkStore::new(Arc::new(pool));
            store.migrate().await.context("Failed to run migrations")?;
            Ok(Arc::new(store))
        }
        Err(e) if config.storage_fallback => {
            tracing::warn!(
                error = %e,
                database = %mask_connection_string(database_url),
                "Database unreachable, falling back to in-memory store"
            );
            Ok(Arc::new(MemoryLinkStore::new()))
        }
        Err(e) => Err(e).context("Failed to connect to database"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

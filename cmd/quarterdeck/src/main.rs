//! # Quarterdeck Server
//!
//! Assembles the adapters into a running HTTP service: PostgreSQL storage,
//! JWT identity, and the axum API mounted under `/api`.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, ApiMetrics, AppState};
use auth_adapters::JwtIdentityProvider;
use configs::AppConfig;
use services::{ForumService, NotificationService};
use storage_adapters::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    // 1. Storage: one PostgreSQL pool behind all four ports
    let store = Arc::new(
        PgStore::connect(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await
        .context("failed to connect to PostgreSQL")?,
    );
    store.migrate().await.context("failed to run migrations")?;

    // 2. Identity: trusts tokens minted by the platform's login service
    let identity = Arc::new(JwtIdentityProvider::new(
        config.auth.jwt_secret.expose_secret(),
    ));

    // 3. Services over the shared store
    let forum = Arc::new(ForumService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(store));

    let state = AppState {
        forum,
        notifications,
        identity,
        metrics: ApiMetrics::new(),
    };
    let app = Router::new().nest("/api", router(state));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "quarterdeck listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("quarterdeck stopped");
    Ok(())
}

async fn shutdown_signal() {
    // SIGINT is enough for both local runs and container stop hooks.
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}

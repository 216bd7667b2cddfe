mod config;
mod db;
mod entities;
mod error;
mod models;
mod openapi;
mod routes;
mod service;
mod templates;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::ConnectOptions;

use crate::{
    config::{Config, StartupPolicy},
    db::ConnectionProvider,
    service::ListingService,
};

pub struct AppState {
    pub config: Arc<Config>,
    pub listings: ListingService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cartelera=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::info!(
        database = %config.redacted_database_url(),
        policy = %config.startup_policy,
        "configuration loaded"
    );

    let app = build_app(config.clone()).await?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, docs = routes::DOCS_PATH, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Starts establishing the database connection and applies the startup
/// policy to its outcome.
async fn build_app(config: Arc<Config>) -> anyhow::Result<Router> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.max_connections(config.max_connections);

    let provider = ConnectionProvider::establish(options, config.run_migrations);

    match config.startup_policy {
        StartupPolicy::FailFast => {
            provider.ready().await.context("database connection failed, not starting server")?;
        },
        StartupPolicy::ServeDegraded => {
            let pending = provider.clone();
            tokio::spawn(async move {
                if pending.ready().await.is_err() {
                    tracing::warn!("serving without a database; requests will fail with 500");
                }
            });
        },
    }

    let state = Arc::new(AppState { config, listings: ListingService::new(provider) });
    Ok(routes::router(state))
}

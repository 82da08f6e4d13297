//! Storefront - cart, checkout and order administration service

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront::{
    config::Config,
    handler,
    publisher::{DynEventPublisher, NatsPublisher, NoopPublisher},
    AppState,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to create database connection pool")?;
    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&db).await.context("Failed to run migrations")?;
    }

    let publisher = connect_publisher(config.nats_url.as_deref()).await;
    let app = handler::router(AppState::postgres(db, publisher));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("🚀 Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("✅ Storefront shutdown complete.");
    Ok(())
}

async fn connect_publisher(url: Option<&str>) -> DynEventPublisher {
    let Some(url) = url else { return Arc::new(NoopPublisher) };
    match async_nats::connect(url).await {
        Ok(client) => {
            info!("Publishing order events to {}", url);
            Arc::new(NatsPublisher::new(client))
        }
        Err(err) => {
            warn!("Failed to connect to NATS at {}: {}. Order events disabled.", url, err);
            Arc::new(NoopPublisher)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received.");
}

mod config;
mod error;
mod http;
mod identity;
mod scheduler;
mod state;

use anyhow::Context;
use chrono::FixedOffset;
use dotenvy::dotenv;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use domain::Anime;
use http::router::build_router;
use state::AppState;
use storage::{AnimeCatalog, Db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let week_zone = FixedOffset::east_opt(settings.analytics.utc_offset_minutes * 60)
        .with_context(|| {
            format!(
                "Invalid analytics.utc_offset_minutes: {}",
                settings.analytics.utc_offset_minutes
            )
        })?;
    let db = Db::connect(&settings.database.url, settings.database.max_connections)
        .await?
        .with_week_zone(week_zone);

    let catalog = AnimeCatalog::new(db.clone());
    if let Some(path) = &settings.catalog.seed_path {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog seed: {}", path))?;
        let animes: Vec<Anime> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid catalog seed: {}", path))?;
        let n = catalog.seed(&animes).await?;
        info!("Loaded {} anime from {}", n, path);
    }

    if settings.analytics.reset_interval_secs > 0 {
        scheduler::spawn_weekly_reset(
            db.clone(),
            Duration::from_secs(settings.analytics.reset_interval_secs),
        );
    }

    let state = AppState {
        db,
        catalog,
        identity_salt: settings.security.identity_salt.clone(),
        admin_token: settings.security.admin_token.clone(),
        pagination: settings.pagination,
    };

    let app = build_router(state.clone(), &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

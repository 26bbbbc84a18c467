use std::sync::Arc;

use anyhow::Context;

mod app;
mod config;
mod error;
mod state;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);

    let default_filter = if config.debug {
        "userbase=debug,axum=info,tower_http=debug"
    } else {
        "userbase=info,axum=info,tower_http=info"
    };
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init(config).await?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("run database migrations")?;

    let db = state.db.clone();
    let config = state.config.clone();
    let app = app::build_app(state);
    app::serve(app, &config).await?;

    db.close().await;
    tracing::info!("database pool closed");

    Ok(())
}

use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod state;

use crate::auth::repo::PgCredentialStore;
use crate::config::{AppConfig, StoreBackend};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userauth=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;

    match (config.backend, &config.database) {
        (StoreBackend::Postgres, Some(db_config)) => {
            let pool = db::connect(db_config).await?;
            let state = AppState::from_parts(Arc::new(PgCredentialStore::new(pool.clone())));

            let served = app::serve(app::build_app(state), &config.server).await;

            pool.close().await;
            tracing::info!("database pool closed");
            served?;
        }
        (StoreBackend::Postgres, None) => anyhow::bail!("postgres backend without database config"),
        (StoreBackend::Memory, _) => {
            tracing::warn!("using in-memory store; users are lost on shutdown");
            app::serve(app::build_app(AppState::in_memory()), &config.server).await?;
        }
    }

    Ok(())
}

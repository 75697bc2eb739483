use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let options = match &cfg.url {
        Some(url) => url.parse::<PgConnectOptions>().context("parse DATABASE_URL")?,
        None => {
            let options = PgConnectOptions::new()
                .host(&cfg.host)
                .port(cfg.port)
                .username(&cfg.user)
                .database(&cfg.name);
            match &cfg.password {
                Some(password) => options.password(password),
                None => options,
            }
        }
    };

    let host = options.get_host().to_string();
    let database = options.get_database().unwrap_or_default().to_string();

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;

    tracing::info!(
        %host,
        %database,
        max_connections = cfg.max_connections,
        "database pool opened"
    );
    Ok(pool)
}

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
    /// Takes precedence over the individual parts when set.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub database: Option<DbConfig>,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match var("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORE_BACKEND: {other}"),
        };

        let database = match backend {
            StoreBackend::Postgres => Some(DbConfig::from_lookup(&var)?),
            StoreBackend::Memory => None,
        };

        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "APP_PORT", 8080)?,
        };

        Ok(Self {
            backend,
            database,
            server,
        })
    }
}

impl DbConfig {
    fn from_lookup<F>(var: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = var("DATABASE_URL").filter(|v| !v.is_empty());
        let required = |key: &str| -> anyhow::Result<String> {
            match (var(key), &url) {
                (Some(v), _) => Ok(v),
                (None, Some(_)) => Ok(String::new()),
                (None, None) => anyhow::bail!("{key} must be set"),
            }
        };

        Ok(Self {
            host: var("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(var, "DB_PORT", 5432)?,
            user: required("DB_USER")?,
            password: var("DB_PASSWORD"),
            name: required("DB_NAME")?,
            max_connections: parse_or(var, "DB_MAX_CONNECTIONS", 10)?,
            url,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}

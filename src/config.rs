use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub automation: AutomationConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomationConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub poll_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
                max_connections: optional_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(5),
            },
            server: ServerConfig {
                port: optional_var("SERVER_PORT")?.unwrap_or(8080),
            },
            automation: AutomationConfig {
                webhook_url: env::var("AUTOMATION_WEBHOOK_URL")
                    .context("AUTOMATION_WEBHOOK_URL is not set")?,
            },
            dashboard: DashboardConfig {
                poll_secs: optional_var("DASHBOARD_POLL_SECS")?.unwrap_or(10),
            },
        })
    }
}

fn optional_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {value}"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

//! Runtime configuration, loaded once from the environment at start-up.

use std::collections::HashMap;

use crate::notify::{NotificationConfig, DEFAULT_BROADCAST_DESTINATION, DEFAULT_KEY_PREFIX};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_addr: String,
    pub storage: StorageBackend,
    pub postgres: PostgresConfig,
    pub redis_url: Option<String>,
    pub notification: NotificationConfig,
    /// Static subscriber list used when there is no database directory.
    pub subscribers: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key/value source (tests use a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let storage = match get("STORAGE_BACKEND", "memory").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let port: u16 = parse("POSTGRES_PORT", &get("POSTGRES_PORT", "5432"))?;
        let max_connections: u32 = parse(
            "POSTGRES_MAX_CONNECTIONS",
            &get("POSTGRES_MAX_CONNECTIONS", "5"),
        )?;

        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    get("POSTGRES_USER", "postgres"),
                    get("POSTGRES_PASSWORD", ""),
                    get("POSTGRES_HOST", "localhost"),
                    port,
                    get("POSTGRES_DB", "flash_sale"),
                )
            });

        let subscribers = lookup("NOTIFY_SUBSCRIBERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            http_addr: get("HTTP_ADDR", "0.0.0.0:9090"),
            storage,
            postgres: PostgresConfig {
                url,
                max_connections,
            },
            redis_url: lookup("REDIS_URL").filter(|v| !v.trim().is_empty()),
            notification: NotificationConfig {
                broadcast_destination: get(
                    "NOTIFY_BROADCAST_DESTINATION",
                    DEFAULT_BROADCAST_DESTINATION,
                ),
                key_prefix: get("NOTIFY_KEY_PREFIX", DEFAULT_KEY_PREFIX),
            },
            subscribers,
        })
    }

    /// Convenience for tests: configuration from a fixed map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }
}

fn parse<T: core::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

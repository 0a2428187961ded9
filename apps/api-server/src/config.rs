//! Application configuration loaded from environment variables.

use std::env;

use scribe_core::service::DEFAULT_MAX_COVER_BYTES;
use scribe_infra::auth::JwtConfig;
use scribe_infra::database::DatabaseConfig;
use scribe_infra::storage::StorageConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on in-memory repositories.
    pub database: Option<DatabaseConfig>,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub max_cover_bytes: usize,
    /// Apply pending migrations right after connecting.
    pub run_migrations: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
            sqlx_logging: env::var("DB_SQL_LOGGING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            storage: StorageConfig::from_env(),
            jwt: JwtConfig::from_env(),
            max_cover_bytes: parse_var("MAX_COVER_BYTES").unwrap_or(DEFAULT_MAX_COVER_BYTES),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::PostService;
use scribe_core::ports::{
    FileStorage, PasswordService, PostRepository, TokenService, UserRepository,
};
use scribe_infra::database::{DatabaseConnections, InMemoryPostRepository, InMemoryUserRepository};
use scribe_infra::{Argon2PasswordService, JwtTokenService, LocalDiskStorage};

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use scribe_infra::database::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

type Repositories = (
    Option<Arc<DatabaseConnections>>,
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, users, posts) = Self::repositories(config).await;

        let storage: Arc<dyn FileStorage> =
            Arc::new(LocalDiskStorage::new(config.storage.clone()));
        tracing::info!(root = %config.storage.root.display(), "Public disk ready");

        let state = Self {
            users,
            posts: PostService::new(posts, storage).with_max_cover_bytes(config.max_cover_bytes),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            db,
        };

        tracing::info!(database = state.database_mode(), "Application state initialized");
        state
    }

    /// `"postgres"` when backed by a live pool, `"memory"` otherwise.
    pub fn database_mode(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }

    fn in_memory() -> Repositories {
        (
            None,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                if config.run_migrations {
                    if let Err(e) = Migrator::up(&connections.main, None).await {
                        tracing::error!(error = %e, "Migrations failed. Using in-memory fallback.");
                        return Self::in_memory();
                    }
                    tracing::info!("Migrations applied");
                }
                let conn = Arc::new(connections);
                let users = Arc::new(PostgresUserRepository::new(conn.main.clone()));
                let posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                (Some(conn), users, posts)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory()
    }
}

//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`:
//! repositories, the public file disk, and token/password services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No external dependencies, in-memory repositories only

pub mod auth;
pub mod database;
pub mod storage;

// Re-exports
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConnections, InMemoryPostRepository, InMemoryUserRepository};
pub use storage::{LocalDiskStorage, StorageConfig};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};

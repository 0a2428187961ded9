//! File storage implementations.

mod local;

pub use local::{LocalDiskStorage, StorageConfig};

//! File storage port - the public disk that holds uploaded covers.

use async_trait::async_trait;

/// Storage backend trait for pluggable file storage.
///
/// Paths are relative to the disk root and use `/` as separator,
/// e.g. `posts/post-1700000000.png`.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `contents` as `folder/name` and return the relative path.
    /// An existing file at that path is overwritten.
    async fn store(&self, folder: &str, name: &str, contents: &[u8])
    -> Result<String, StorageError>;

    /// Check if a file exists.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Public URL a client can fetch the file from.
    fn url(&self, path: &str) -> String;
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

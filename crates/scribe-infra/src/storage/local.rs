//! Local filesystem "public disk".

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use scribe_core::ports::{FileStorage, StorageError};

/// Where the public disk lives and how clients reach it.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// Base URL the root is served under, without trailing slash.
    pub public_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage/app/public"),
            public_url: "http://127.0.0.1:8080/storage".to_string(),
        }
    }
}

impl StorageConfig {
    /// Read `STORAGE_ROOT` and `PUBLIC_STORAGE_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root: std::env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
            public_url: std::env::var("PUBLIC_STORAGE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_url),
        }
    }
}

/// Stores files under a root directory, addressed by relative `/` paths.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalDiskStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            root: config.root,
            public_url: config.public_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative path onto the root, refusing anything that could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{action} {}: {err}", path.display()))
}

#[async_trait]
impl FileStorage for LocalDiskStorage {
    async fn store(
        &self,
        folder: &str,
        name: &str,
        contents: &[u8],
    ) -> Result<String, StorageError> {
        if name.contains('/') {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        let relative = format!("{}/{}", folder.trim_matches('/'), name);
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create", parent, e))?;
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| io_error("write", &target, e))?;

        tracing::debug!(path = %relative, bytes = contents.len(), "File stored");
        Ok(relative)
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.resolve(path)?;
        tokio::fs::try_exists(&target)
            .await
            .map_err(|e| io_error("stat", &target, e))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::debug!(%path, "File deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", &target, e)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.public_url, path.trim_start_matches('/'))
    }
}

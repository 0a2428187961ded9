use std::path::Path;

use chrono::{DateTime, Utc};

/// An uploaded cover image as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverUpload {
    /// File name supplied by the client, used only for its extension.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// Total size announced by the stream. May exceed `bytes.len()` when the
    /// reader stopped buffering an oversized upload.
    pub size: usize,
}

impl CoverUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
            size,
        }
    }

    /// Extension of the client file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }

    /// Stored name: `post-<unix seconds>.<ext>`.
    pub fn stored_name(&self, now: DateTime<Utc>) -> String {
        match self.extension() {
            Some(ext) => format!("post-{}.{}", now.timestamp(), ext),
            None => format!("post-{}", now.timestamp()),
        }
    }
}

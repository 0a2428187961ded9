use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::domain::{CoverUpload, Page, Post, PostQuery};
use crate::error::{DomainError, RepoError};
use crate::ports::{FileStorage, PostRepository};
use crate::validation::{PostInput, ValidPost, cover_too_large, field_errors};

/// Fixed listing page size.
pub const PER_PAGE: u64 = 10;

/// Folder on the public disk that holds post covers.
pub const COVER_FOLDER: &str = "posts";

pub const DEFAULT_MAX_COVER_BYTES: usize = 10 * 1024 * 1024;

/// Post operations for an authenticated owner.
///
/// Every operation takes the owner id explicitly and only ever touches that
/// owner's posts. Another owner's post is indistinguishable from a missing one.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    storage: Arc<dyn FileStorage>,
    max_cover_bytes: usize,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            posts,
            storage,
            max_cover_bytes: DEFAULT_MAX_COVER_BYTES,
        }
    }

    pub fn with_max_cover_bytes(mut self, max_cover_bytes: usize) -> Self {
        self.max_cover_bytes = max_cover_bytes;
        self
    }

    pub fn max_cover_bytes(&self) -> usize {
        self.max_cover_bytes
    }

    /// Public URL of the post's cover, if it has one.
    pub fn cover_url(&self, post: &Post) -> Option<String> {
        post.cover.as_deref().map(|path| self.storage.url(path))
    }

    /// List the owner's posts, newest first, `PER_PAGE` at a time.
    pub async fn list(
        &self,
        owner_id: Uuid,
        keyword: Option<&str>,
        page: u64,
    ) -> Result<Page<Post>, DomainError> {
        let query = PostQuery::new(keyword, page, PER_PAGE);
        tracing::debug!(%owner_id, keyword = ?query.keyword, page = query.page, "Listing posts");

        Ok(self.posts.list_owned(owner_id, &query).await?)
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        input: PostInput,
        cover: Option<CoverUpload>,
    ) -> Result<Post, DomainError> {
        let input = self.validate(input, cover.as_ref())?;

        let cover_path = match &cover {
            Some(upload) => Some(self.store_cover(upload).await?),
            None => None,
        };

        let post = Post::new(owner_id, input, cover_path.clone());
        match self.posts.insert(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, %owner_id, "Post created");
                Ok(post)
            }
            Err(e) => {
                if let Some(path) = &cover_path {
                    self.remove_cover(path).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_owned(owner_id, id)
            .await?
            .ok_or_else(DomainError::post_not_found)
    }

    /// Replace title, content and publish flag; swap the cover when a new one
    /// is uploaded.
    ///
    /// The new cover is stored and the record committed before the old file
    /// is removed, so the record never points at a file that is already gone.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: PostInput,
        cover: Option<CoverUpload>,
    ) -> Result<Post, DomainError> {
        let input = self.validate(input, cover.as_ref())?;
        let mut post = self.get(owner_id, id).await?;
        let previous = post.cover.clone();

        let replacement = match &cover {
            Some(upload) => Some(self.store_cover(upload).await?),
            None => None,
        };

        post.apply(input, replacement.clone().or_else(|| previous.clone()));

        let post = match self.posts.update_owned(owner_id, post).await {
            Ok(post) => post,
            Err(e) => {
                // Same-second uploads with the same extension share a name.
                if let Some(path) = replacement.as_ref().filter(|p| previous.as_ref() != Some(*p)) {
                    self.remove_cover(path).await;
                }
                return Err(not_found_or(e));
            }
        };

        if let (Some(new), Some(old)) = (&replacement, &previous) {
            if new != old {
                self.remove_cover(old).await;
            }
        }

        tracing::info!(post_id = %post.id, %owner_id, cover_replaced = replacement.is_some(), "Post updated");
        Ok(post)
    }

    /// Delete the post, then its cover file.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self.get(owner_id, id).await?;

        self.posts
            .delete_owned(owner_id, post.id)
            .await
            .map_err(not_found_or)?;

        if let Some(cover) = &post.cover {
            self.remove_cover(cover).await;
        }

        tracing::info!(post_id = %post.id, %owner_id, "Post deleted");
        Ok(())
    }

    /// Check the input and cover against the post rules.
    pub fn validate(
        &self,
        input: PostInput,
        cover: Option<&CoverUpload>,
    ) -> Result<ValidPost, DomainError> {
        let cover_error = cover
            .filter(|c| c.size > self.max_cover_bytes)
            .map(|_| cover_too_large(self.max_cover_bytes));

        let mut errors = match (input.into_valid(), cover_error.is_some()) {
            (Ok(valid), false) => return Ok(valid),
            (Ok(_), true) => ValidationErrors::new(),
            (Err(errors), _) => errors,
        };
        if let Some(err) = cover_error {
            errors.add("cover", err);
        }

        Err(DomainError::Validation(field_errors(&errors)))
    }

    async fn store_cover(&self, upload: &CoverUpload) -> Result<String, DomainError> {
        let name = upload.stored_name(Utc::now());
        let path = self.storage.store(COVER_FOLDER, &name, &upload.bytes).await?;
        tracing::debug!(%path, bytes = upload.bytes.len(), "Cover stored");
        Ok(path)
    }

    /// Best-effort removal; a leftover file is logged, not surfaced.
    async fn remove_cover(&self, path: &str) {
        match self.storage.exists(path).await {
            Ok(true) => {
                if let Err(e) = self.storage.delete(path).await {
                    tracing::warn!(%path, error = %e, "Failed to delete cover");
                }
            }
            Ok(false) => tracing::debug!(%path, "Cover already absent"),
            Err(e) => tracing::warn!(%path, error = %e, "Failed to check cover"),
        }
    }
}

/// A write that lost the row (deleted concurrently) reads as not found.
fn not_found_or(err: RepoError) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(),
        other => other.into(),
    }
}

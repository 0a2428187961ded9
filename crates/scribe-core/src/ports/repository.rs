use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Page, Post, PostQuery, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Every read and write takes the owner explicitly; there is no unscoped lookup,
/// so a user can never reach another user's posts through this trait.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post. The owner is `post.owner_id`.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Find a post by id among the posts of `owner_id`.
    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// List posts of `owner_id`, newest first, filtered and paginated by `query`.
    async fn list_owned(&self, owner_id: Uuid, query: &PostQuery)
    -> Result<Page<Post>, RepoError>;

    /// Persist the mutable fields of `post`. Fails with `RepoError::NotFound`
    /// when the post does not belong to `owner_id`.
    async fn update_owned(&self, owner_id: Uuid, post: Post) -> Result<Post, RepoError>;

    /// Delete a post of `owner_id`. Fails with `RepoError::NotFound` when absent.
    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError>;
}

//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Page, Post, PostQuery, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::mask_email;

/// Users keyed by id, with email uniqueness enforced on save.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let email = User::normalize_email(email);
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}

/// Posts in insertion order. Title matching is a case-sensitive substring test.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        rows.push(post.clone());
        Ok(post)
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|p| p.id == id && p.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        query: &PostQuery,
    ) -> Result<Page<Post>, RepoError> {
        let rows = self.rows.read().await;

        // Newest insert first so equal timestamps still come out latest-first.
        let mut matching: Vec<&Post> = rows
            .iter()
            .rev()
            .filter(|p| p.owner_id == owner_id)
            .filter(|p| match &query.keyword {
                Some(keyword) => p.title.contains(keyword.as_str()),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.per_page as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            page: query.page,
            per_page: query.per_page,
            total,
        })
    }

    async fn update_owned(&self, owner_id: Uuid, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == post.id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;

        row.title = post.title;
        row.content = post.content;
        row.cover = post.cover;
        row.is_published = post.is_published;
        row.updated_at = post.updated_at;

        Ok(row.clone())
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|p| p.id == id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;

        rows.remove(position);
        Ok(())
    }
}

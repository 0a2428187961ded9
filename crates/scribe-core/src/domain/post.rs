use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidPost;

/// Post entity - an article owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    /// Relative path of the cover image on the public disk.
    pub cover: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post for `owner_id` from validated input.
    pub fn new(owner_id: Uuid, input: ValidPost, cover: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: input.title,
            content: input.content,
            cover,
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields. `id`, `owner_id` and `created_at` never change.
    pub fn apply(&mut self, input: ValidPost, cover: Option<String>) {
        self.title = input.title;
        self.content = input.content;
        self.is_published = input.is_published;
        self.cover = cover;
        self.updated_at = Utc::now();
    }
}

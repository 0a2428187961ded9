//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use scribe_core::domain::{Page, Post, PostQuery, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository. Only exposes the owner-scoped operations of
/// `PostRepository`.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// `LIKE` pattern matching `keyword` literally anywhere in the column.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(User::normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = active.insert(&self.db).await.map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::UserId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        query: &PostQuery,
    ) -> Result<Page<Post>, RepoError> {
        let mut select = PostEntity::find().filter(post::Column::UserId.eq(owner_id));
        if let Some(keyword) = &query.keyword {
            select = select.filter(post::Column::Title.like(contains_pattern(keyword)));
        }

        let paginator = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, query.per_page);

        let total = paginator.num_items().await.map_err(query_error)?;
        let items = if query.offset() >= total {
            Vec::new()
        } else {
            paginator
                .fetch_page(query.page - 1)
                .await
                .map_err(query_error)?
        };

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            page: query.page,
            per_page: query.per_page,
            total,
        })
    }

    async fn update_owned(&self, owner_id: Uuid, post: Post) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = post.into();
        // Ownership and creation time are fixed at insert.
        active.user_id = NotSet;
        active.created_at = NotSet;

        let model = PostEntity::update(active)
            .filter(post::Column::UserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::UserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}

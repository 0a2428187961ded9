use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use scribe_core::domain::{Post, PostQuery, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(owner_id: Uuid, title: &str, cover: Option<&str>) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        user_id: owner_id,
        title: title.to_owned(),
        content: "Content".to_owned(),
        cover: cover.map(String::from),
        is_published: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_owned_maps_model() {
    let owner = Uuid::new_v4();
    let model = post_model(owner, "Test Post", Some("posts/post-1.png"));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_owned(owner, model.id).await.unwrap().unwrap();

    assert_eq!(post.id, model.id);
    assert_eq!(post.owner_id, owner);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.cover.as_deref(), Some("posts/post-1.png"));
    assert!(post.is_published);
}

#[tokio::test]
async fn test_find_owned_miss_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let found = repo.find_owned(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_list_owned_reports_total() {
    let owner = Uuid::new_v4();
    let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(11)))]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row]])
        .append_query_results([vec![post_model(owner, "rust 11", None)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let page = repo
        .list_owned(owner, &PostQuery::new(Some("rust"), 2, 10))
        .await
        .unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.page, 2);
    assert_eq!(page.last_page(), 2);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_list_owned_past_last_page_skips_fetch() {
    let owner = Uuid::new_v4();
    let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(3)))]);

    // Only the count query is mocked; a page fetch would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let page = repo
        .list_owned(owner, &PostQuery::new(None, u64::MAX, 10))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert_eq!(page.page, u64::MAX);
    assert_eq!(page.last_page(), 1);
}

#[tokio::test]
async fn test_delete_owned_without_rows_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let result = repo.delete_owned(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_insert_returns_stored_post() {
    let owner = Uuid::new_v4();
    let model = post_model(owner, "Fresh", None);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let stored = repo.insert(Post::from(model.clone())).await.unwrap();
    assert_eq!(stored.id, model.id);
    assert_eq!(stored.cover, None);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = Utc::now();
    let model = user::Model {
        id: Uuid::new_v4(),
        email: "writer@example.com".to_owned(),
        password_hash: "$argon2id$stub".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .append_query_results([vec![model.clone()]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let by_email = repo.find_by_email("Writer@Example.com").await.unwrap();
    assert_eq!(by_email.unwrap().id, model.id);

    let by_id: Option<User> = repo.find_by_id(model.id).await.unwrap();
    assert_eq!(by_id.unwrap().email, "writer@example.com");
}

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CoverUpload, Page, Post, PostQuery};
use crate::error::{DomainError, RepoError};
use crate::ports::{FileStorage, PostRepository, StorageError};
use crate::validation::{PostInput, ValidPost};

use super::{COVER_FOLDER, PER_PAGE, PostService};

#[derive(Default)]
struct FakePosts {
    rows: Mutex<Vec<Post>>,
    fail_writes: AtomicBool,
}

impl FakePosts {
    fn check_writes(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Query("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.check_writes()?;
        self.rows.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.lock().unwrap();
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
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Post> = rows
            .iter()
            .rev()
            .filter(|p| p.owner_id == owner_id)
            .filter(|p| query.keyword.as_deref().is_none_or(|k| p.title.contains(k)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page as usize)
            .collect();

        Ok(Page {
            items,
            page: query.page,
            per_page: query.per_page,
            total,
        })
    }

    async fn update_owned(&self, owner_id: Uuid, post: Post) -> Result<Post, RepoError> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == post.id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;
        *row = post.clone();
        Ok(post)
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(p.id == id && p.owner_id == owner_id));
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeStorage {
    fn put(&self, path: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), b"old".to_vec());
    }

    fn has(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStorage for FakeStorage {
    async fn store(
        &self,
        folder: &str,
        name: &str,
        contents: &[u8],
    ) -> Result<String, StorageError> {
        let path = format!("{folder}/{name}");
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), contents.to_vec());
        Ok(path)
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.has(path))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("http://files.test/storage/{path}")
    }
}

fn setup() -> (PostService, Arc<FakePosts>, Arc<FakeStorage>) {
    let posts = Arc::new(FakePosts::default());
    let storage = Arc::new(FakeStorage::default());
    let service = PostService::new(posts.clone(), storage.clone());
    (service, posts, storage)
}

fn input(title: &str) -> PostInput {
    PostInput::new(title, "World", true)
}

fn seed(posts: &FakePosts, owner_id: Uuid, title: &str, cover: Option<&str>) -> Post {
    let valid = ValidPost {
        title: title.to_string(),
        content: "seeded".to_string(),
        is_published: false,
    };
    let post = Post::new(owner_id, valid, cover.map(String::from));
    posts.rows.lock().unwrap().push(post.clone());
    post
}

fn assert_cover_name(path: &str, ext: &str) {
    let name = path
        .strip_prefix(&format!("{COVER_FOLDER}/post-"))
        .expect("cover stored under posts/post-");
    let (timestamp, extension) = name.split_once('.').expect("extension present");
    assert!(timestamp.parse::<i64>().is_ok(), "timestamp in {path}");
    assert_eq!(extension, ext);
}

#[tokio::test]
async fn test_create_without_cover() {
    let (service, _, storage) = setup();
    let owner = Uuid::new_v4();

    let post = service.create(owner, input("Hello"), None).await.unwrap();

    assert_eq!(post.owner_id, owner);
    assert_eq!(post.title, "Hello");
    assert!(post.is_published);
    assert_eq!(post.cover, None);
    assert_eq!(service.cover_url(&post), None);
    assert_eq!(storage.count(), 0);
}

#[tokio::test]
async fn test_create_stores_cover() {
    let (service, _, storage) = setup();
    let upload = CoverUpload::new("a.png", vec![0x89, 0x50]);

    let post = service
        .create(Uuid::new_v4(), input("Hello"), Some(upload))
        .await
        .unwrap();

    let cover = post.cover.clone().unwrap();
    assert_cover_name(&cover, "png");
    assert!(storage.has(&cover));
    assert_eq!(
        service.cover_url(&post),
        Some(format!("http://files.test/storage/{cover}"))
    );
}

#[tokio::test]
async fn test_create_rejects_invalid_input_before_storing() {
    let (service, posts, storage) = setup();
    let upload = CoverUpload::new("a.png", vec![1]);

    let err = service
        .create(Uuid::new_v4(), input(""), Some(upload))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(fields) => {
            assert_eq!(fields["title"], vec!["The title field is required."]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(storage.count(), 0);
    assert!(posts.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_cover_is_a_validation_error() {
    let (service, _, storage) = setup();
    let service = service.with_max_cover_bytes(2048);
    let upload = CoverUpload::new("big.png", vec![0; 4096]);

    let err = service
        .create(Uuid::new_v4(), input("Hello"), Some(upload))
        .await
        .unwrap_err();

    let DomainError::Validation(fields) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        fields["cover"],
        vec!["The cover field must not be greater than 2 kilobytes."]
    );
    assert!(!fields.contains_key("title"));
    assert_eq!(storage.count(), 0);
}

#[tokio::test]
async fn test_failed_insert_discards_stored_cover() {
    let (service, posts, storage) = setup();
    posts.fail_writes.store(true, Ordering::SeqCst);

    let err = service
        .create(
            Uuid::new_v4(),
            input("Hello"),
            Some(CoverUpload::new("a.png", vec![1])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Repository(RepoError::Query(_))));
    assert_eq!(storage.count(), 0);
}

#[tokio::test]
async fn test_update_replaces_cover_and_removes_old_file() {
    let (service, posts, storage) = setup();
    let owner = Uuid::new_v4();
    storage.put("posts/post-100.png");
    let post = seed(&posts, owner, "Hello", Some("posts/post-100.png"));

    let updated = service
        .update(
            owner,
            post.id,
            input("Hello again"),
            Some(CoverUpload::new("b.jpg", vec![2])),
        )
        .await
        .unwrap();

    let cover = updated.cover.clone().unwrap();
    assert_cover_name(&cover, "jpg");
    assert!(storage.has(&cover));
    assert!(!storage.has("posts/post-100.png"));
    assert_eq!(updated.title, "Hello again");
    assert_eq!(updated.created_at, post.created_at);
}

#[tokio::test]
async fn test_update_without_cover_keeps_previous() {
    let (service, posts, storage) = setup();
    let owner = Uuid::new_v4();
    storage.put("posts/post-100.png");
    let post = seed(&posts, owner, "Hello", Some("posts/post-100.png"));

    let updated = service
        .update(owner, post.id, input("Renamed"), None)
        .await
        .unwrap();

    assert_eq!(updated.cover.as_deref(), Some("posts/post-100.png"));
    assert!(storage.has("posts/post-100.png"));
}

#[tokio::test]
async fn test_failed_update_keeps_old_cover() {
    let (service, posts, storage) = setup();
    let owner = Uuid::new_v4();
    storage.put("posts/post-100.png");
    let post = seed(&posts, owner, "Hello", Some("posts/post-100.png"));
    posts.fail_writes.store(true, Ordering::SeqCst);

    let err = service
        .update(
            owner,
            post.id,
            input("Hello"),
            Some(CoverUpload::new("b.jpg", vec![2])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Repository(_)));
    assert!(storage.has("posts/post-100.png"));
    assert_eq!(storage.count(), 1);
}

#[tokio::test]
async fn test_other_owner_sees_not_found() {
    let (service, posts, storage) = setup();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    storage.put("posts/post-100.png");
    let post = seed(&posts, owner, "Private", Some("posts/post-100.png"));

    let get = service.get(intruder, post.id).await.unwrap_err();
    let update = service
        .update(intruder, post.id, input("Mine now"), None)
        .await
        .unwrap_err();
    let delete = service.delete(intruder, post.id).await.unwrap_err();

    for err in [get, update, delete] {
        assert!(matches!(err, DomainError::NotFound { .. }), "got {err:?}");
    }
    assert_eq!(service.get(owner, post.id).await.unwrap().title, "Private");
    assert!(storage.has("posts/post-100.png"));
}

#[tokio::test]
async fn test_delete_removes_record_and_cover() {
    let (service, posts, storage) = setup();
    let owner = Uuid::new_v4();
    storage.put("posts/post-100.png");
    let post = seed(&posts, owner, "Doomed", Some("posts/post-100.png"));

    service.delete(owner, post.id).await.unwrap();

    assert!(!storage.has("posts/post-100.png"));
    assert!(matches!(
        service.get(owner, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_tolerates_missing_cover_file() {
    let (service, posts, _) = setup();
    let owner = Uuid::new_v4();
    let post = seed(&posts, owner, "Dangling", Some("posts/gone.png"));

    service.delete(owner, post.id).await.unwrap();
    assert!(posts.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let (service, posts, _) = setup();
    let owner = Uuid::new_v4();
    for i in 0..12 {
        seed(&posts, owner, &format!("rust tip {i}"), None);
    }
    seed(&posts, owner, "gardening", None);
    seed(&posts, Uuid::new_v4(), "rust elsewhere", None);

    let first = service.list(owner, None, 1).await.unwrap();
    assert_eq!(first.total, 13);
    assert_eq!(first.items.len() as u64, PER_PAGE);
    assert_eq!(first.items[0].title, "gardening");
    assert_eq!(first.last_page(), 2);

    let filtered = service.list(owner, Some("rust"), 2).await.unwrap();
    assert_eq!(filtered.total, 12);
    assert_eq!(filtered.items.len(), 2);
    assert!(filtered.items.iter().all(|p| p.title.contains("rust")));
    assert!(filtered.items.iter().all(|p| p.owner_id == owner));
}

//! Post handlers - owner-scoped CRUD over `PostService`.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::PostService;
use scribe_core::domain::{Page, Post};
use scribe_shared::Envelope;
use scribe_shared::dto::{ListPostsQuery, PageMeta, PostPage, PostResource};

use super::form::PostForm;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_resource(posts: &PostService, post: Post) -> PostResource {
    PostResource {
        cover: posts.cover_url(&post),
        id: post.id,
        title: post.title,
        content: post.content,
        is_published: post.is_published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn to_page(posts: &PostService, page: Page<Post>) -> PostPage {
    let meta = PageMeta {
        current_page: page.page,
        last_page: page.last_page(),
        per_page: page.per_page,
        total: page.total,
    };
    PostPage {
        items: page.map(|post| to_resource(posts, post)).items,
        meta,
    }
}

/// Ids that are not UUIDs cannot name a post.
fn post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// GET /api/posts?keyword=&page=
pub async fn index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list(identity.user_id, query.keyword.as_deref(), query.page())
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(to_page(&state.posts, page))))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    form: PostForm,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, form.input, form.cover)
        .await?;

    Ok(HttpResponse::Created().json(Envelope::success(to_resource(&state.posts, post))))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get(identity.user_id, post_id(&path)?)
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(to_resource(&state.posts, post))))
}

/// PUT|PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    form: PostForm,
) -> AppResult<HttpResponse> {
    // A body that fails validation is reported before an id that names nothing.
    let id = match post_id(&path) {
        Ok(id) => id,
        Err(not_found) => {
            state.posts.validate(form.input, form.cover.as_ref())?;
            return Err(not_found);
        }
    };
    let post = state
        .posts
        .update(identity.user_id, id, form.input, form.cover)
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(to_resource(&state.posts, post))))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, post_id(&path)?)
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::message(scribe_shared::response::SUCCESS)))
}

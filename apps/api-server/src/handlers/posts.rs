//! Blog post handlers, public and dashboard.

use actix_web::{HttpResponse, web};
use folio_core::domain::{NewPost, PostChanges, PostStatus};
use folio_core::query::PostQuery;
use folio_shared::ApiResponse;
use folio_shared::dto::{
    CreatePostRequest, PostListQuery, RelatedQuery, RestorePostRequest, UpdatePostRequest,
};
use uuid::Uuid;

use super::list_params;
use crate::middleware::auth::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const RELATED_DEFAULT: u64 = 3;
const RELATED_MAX: u64 = 12;

fn parse_status(value: Option<String>) -> AppResult<Option<PostStatus>> {
    Ok(value.map(|s| s.parse::<PostStatus>()).transpose()?)
}

fn post_query(query: &PostListQuery, status: Option<PostStatus>) -> PostQuery {
    PostQuery {
        category: query.category(),
        status,
        tag: query.tag.clone(),
        search: query.search.clone(),
        params: list_params(&query.list),
    }
}

/// GET /api/blog/posts
pub async fn list_public(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list_published_posts(post_query(&query, None))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/blog/posts/{slug}
pub async fn get_public(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_published_post(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/blog/posts/{slug}/related
pub async fn related(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<RelatedQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(RELATED_DEFAULT).clamp(1, RELATED_MAX);
    let posts = state.posts.related_posts(&slug, limit).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/blog/posts/{id}/views
pub async fn increment_views(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.increment_views(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("View recorded")))
}

/// POST /api/blog/posts/{id}/likes
pub async fn increment_likes(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.increment_likes(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Like recorded")))
}

/// GET /api/admin/posts
pub async fn list_all(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let status = parse_status(query.status())?;
    let page = state.posts.list_posts(&post_query(&query, status)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/admin/posts/{id}
pub async fn get(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/admin/posts
pub async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let new = NewPost {
        status: parse_status(req.status)?,
        title: req.title,
        slug: req.slug,
        excerpt: req.excerpt,
        content: req.content,
        featured_image: req.featured_image,
        images: req.images,
        author_name: req.author_name,
        author_avatar: req.author_avatar,
        category: req.category,
        tags: req.tags,
    };

    let post = state.posts.create_post(new).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(post, "Post created")))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        status: parse_status(req.status)?,
        title: req.title,
        slug: req.slug,
        excerpt: req.excerpt,
        content: req.content,
        featured_image: req.featured_image,
        images: req.images,
        author_name: req.author_name,
        author_avatar: req.author_avatar,
        category: req.category,
        tags: req.tags,
    };

    let post = state.posts.update_post(*id, changes).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post updated")))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Post deleted")))
}

/// POST /api/admin/posts/{id}/archive
pub async fn archive(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.archive_post(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post archived")))
}

/// POST /api/admin/posts/{id}/restore
pub async fn restore(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<RestorePostRequest>,
) -> AppResult<HttpResponse> {
    let target = body.status.parse::<PostStatus>()?;
    let post = state.posts.restore_post(*id, target).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post restored")))
}

//! Gallery image handlers. Uploading the bytes is someone else's job; these
//! only record metadata for URLs that already exist.

use actix_web::{HttpResponse, web};
use folio_core::domain::{GalleryImageChanges, NewGalleryImage};
use folio_core::query::ImageQuery;
use folio_shared::ApiResponse;
use folio_shared::dto::{CreateImageRequest, ImageListQuery, UpdateImageRequest};
use uuid::Uuid;

use super::list_params;
use crate::middleware::auth::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn list_images(state: &AppState, query: &ImageListQuery) -> AppResult<HttpResponse> {
    let query = ImageQuery {
        tag: query.tag.clone(),
        search: query.search.clone(),
        params: list_params(&query.list),
    };
    let page = state.gallery.list_images(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/gallery
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ImageListQuery>,
) -> AppResult<HttpResponse> {
    list_images(&state, &query).await
}

/// GET /api/admin/gallery
pub async fn list_admin(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<ImageListQuery>,
) -> AppResult<HttpResponse> {
    list_images(&state, &query).await
}

/// GET /api/admin/gallery/{id}
pub async fn get(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let image = state.gallery.get_image(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(image)))
}

/// POST /api/admin/gallery
pub async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<CreateImageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let image = state
        .gallery
        .create_image(NewGalleryImage {
            url: req.url,
            filename: req.filename,
            title: req.title,
            description: req.description,
            size: req.size,
            width: req.width,
            height: req.height,
            tags: req.tags,
            uploaded_at: req.uploaded_at,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(image, "Image added")))
}

/// PUT /api/admin/gallery/{id}
pub async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateImageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let image = state
        .gallery
        .update_image(
            *id,
            GalleryImageChanges {
                url: req.url,
                filename: req.filename,
                title: req.title,
                description: req.description,
                tags: req.tags,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(image, "Image updated")))
}

/// DELETE /api/admin/gallery/{id}
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.gallery.delete_image(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Image deleted")))
}

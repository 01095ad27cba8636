//! Category handlers.

use actix_web::{HttpResponse, web};
use folio_core::domain::{CategoryChanges, NewCategory};
use folio_core::query::CategoryQuery;
use folio_shared::ApiResponse;
use folio_shared::dto::{CategoryListQuery, CreateCategoryRequest, UpdateCategoryRequest};
use uuid::Uuid;

use super::list_params;
use crate::middleware::auth::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn list_categories(state: &AppState, query: &CategoryListQuery) -> AppResult<HttpResponse> {
    let query = CategoryQuery {
        search: query.search.clone(),
        params: list_params(&query.list),
    };
    let page = state.categories.list_categories(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/blog/categories
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CategoryListQuery>,
) -> AppResult<HttpResponse> {
    list_categories(&state, &query).await
}

/// GET /api/admin/categories
pub async fn list_admin(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<CategoryListQuery>,
) -> AppResult<HttpResponse> {
    list_categories(&state, &query).await
}

/// GET /api/admin/categories/{id}
pub async fn get(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.categories.get_category(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/admin/categories
pub async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .create_category(NewCategory {
            name: req.name,
            slug: req.slug,
            description: req.description,
            color: req.color,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(category, "Category created")))
}

/// PUT /api/admin/categories/{id}
pub async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .update_category(
            *id,
            CategoryChanges {
                name: req.name,
                slug: req.slug,
                description: req.description,
                color: req.color,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(category, "Category updated")))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.categories.delete_category(*id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Category deleted")))
}

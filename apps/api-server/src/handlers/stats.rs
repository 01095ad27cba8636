use actix_web::{HttpResponse, web};
use folio_shared::ApiResponse;

use crate::middleware::auth::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn post_stats(admin: Admin, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    tracing::debug!(admin = %admin.email, "Computing dashboard stats");
    let stats = state.posts.post_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

//! Dashboard login.

use actix_web::{HttpResponse, web};
use folio_shared::ApiResponse;
use folio_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.auth.login(&req.email, &req.password)?;

    tracing::info!(email = %session.email, "Dashboard login");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthResponse {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
    })))
}

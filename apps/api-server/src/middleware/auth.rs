//! Dashboard authentication extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use folio_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The authenticated site owner.
///
/// Use this in handlers to require a dashboard session:
/// ```ignore
/// async fn protected_route(admin: Admin) -> impl Responder {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Admin {
    pub email: String,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for Admin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::Internal(
                "AppState not found in app data".to_string(),
            )));
        };

        let result = bearer_token(req)
            .and_then(|token| state.auth.authorize(token))
            .map(|email| Admin { email })
            .map_err(|e| {
                tracing::debug!(error = %e, path = req.path(), "Dashboard request rejected");
                AppError::from(e)
            });

        ready(result)
    }
}

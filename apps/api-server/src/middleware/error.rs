//! Error handling - every failure answers with the `{success: false, error}`
//! envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::DomainError;
use folio_core::ports::AuthError;
use folio_shared::ApiResponse;
use thiserror::Error;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Unique or referential conflict.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Too many requests, retry in {0} seconds")]
    TooManyRequests(u64),

    /// Logged, never shown to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!(error = %detail, "Internal error");
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests(secs) = self {
            builder.insert_header(("Retry-After", secs.to_string()));
        }
        builder.json(ApiResponse::failure(self.to_string()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { .. } => AppError::Validation(err.to_string()),
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Conflict(msg) | DomainError::Referential(msg) => AppError::Conflict(msg),
            DomainError::Store(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => AppError::Forbidden,
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_store_errors_are_redacted() {
        let err = AppError::from(DomainError::Store("connection reset by peer".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }

    #[test]
    fn test_domain_error_statuses() {
        let cases = [
            (DomainError::validation("title", "is required"), 422),
            (DomainError::not_found("Post", "hello"), 404),
            (DomainError::Conflict("slug taken".into()), 409),
            (DomainError::Referential("still used".into()), 409),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InsufficientPermissions).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::TooManyRequests(7).error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "7");
    }
}

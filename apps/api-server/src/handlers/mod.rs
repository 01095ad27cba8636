//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod gallery;
mod health;
mod posts;
mod stats;


use actix_web::web;
use folio_core::query::ListParams;
use folio_shared::dto::ListQuery;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// `/api/admin/*` handlers take the [`Admin`](crate::middleware::auth::Admin)
/// extractor; the public counters sit behind `rate_limit`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimitMiddleware) {
    cfg.app_data(extractor_config::json())
        .app_data(extractor_config::query())
        .app_data(extractor_config::path())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .route("/auth/login", web::post().to(auth::login))
                .service(
                    web::scope("/blog")
                        .route("/posts", web::get().to(posts::list_public))
                        .route("/posts/{slug}", web::get().to(posts::get_public))
                        .route("/posts/{slug}/related", web::get().to(posts::related))
                        .service(
                            web::resource("/posts/{id}/views")
                                .wrap(rate_limit.clone())
                                .route(web::post().to(posts::increment_views)),
                        )
                        .service(
                            web::resource("/posts/{id}/likes")
                                .wrap(rate_limit)
                                .route(web::post().to(posts::increment_likes)),
                        )
                        .route("/categories", web::get().to(categories::list)),
                )
                .route("/gallery", web::get().to(gallery::list))
                // Dashboard routes
                .service(
                    web::scope("/admin")
                        .route("/stats", web::get().to(stats::post_stats))
                        .service(
                            web::resource("/posts")
                                .route(web::get().to(posts::list_all))
                                .route(web::post().to(posts::create)),
                        )
                        .service(
                            web::resource("/posts/{id}")
                                .route(web::get().to(posts::get))
                                .route(web::put().to(posts::update))
                                .route(web::delete().to(posts::delete)),
                        )
                        .route("/posts/{id}/archive", web::post().to(posts::archive))
                        .route("/posts/{id}/restore", web::post().to(posts::restore))
                        .service(
                            web::resource("/categories")
                                .route(web::get().to(categories::list_admin))
                                .route(web::post().to(categories::create)),
                        )
                        .service(
                            web::resource("/categories/{id}")
                                .route(web::get().to(categories::get))
                                .route(web::put().to(categories::update))
                                .route(web::delete().to(categories::delete)),
                        )
                        .service(
                            web::resource("/gallery")
                                .route(web::get().to(gallery::list_admin))
                                .route(web::post().to(gallery::create)),
                        )
                        .service(
                            web::resource("/gallery/{id}")
                                .route(web::get().to(gallery::get))
                                .route(web::put().to(gallery::update))
                                .route(web::delete().to(gallery::delete)),
                        ),
                ),
        );
}

/// Extractor failures answer with the same envelope as handler errors.
mod extractor_config {
    use super::*;

    pub fn json() -> web::JsonConfig {
        web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid request body: {err}")).into()
        })
    }

    pub fn query() -> web::QueryConfig {
        web::QueryConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid query string: {err}")).into()
        })
    }

    /// Ids that don't parse can't name anything.
    pub fn path() -> web::PathConfig {
        web::PathConfig::default().error_handler(|err, req| {
            AppError::NotFound(format!("No resource at {}: {err}", req.path())).into()
        })
    }
}

fn list_params(query: &ListQuery) -> ListParams {
    ListParams {
        sort_by: query.sort_by.clone(),
        sort_order: query.sort_order.clone(),
        page: query.page,
        limit: query.limit,
    }
}

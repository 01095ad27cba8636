//! # Folio API Server
//!
//! The Actix-web HTTP server behind the author site: the public blog and
//! gallery, plus the dashboard under `/api/admin`.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        trust_proxy = config.trust_proxy,
        "Starting Folio API Server"
    );

    let state = AppState::new(&config).await;
    let rate_limit =
        RateLimitMiddleware::new(state.rate_limiter.clone()).trust_proxy(config.trust_proxy);

    HttpServer::new(move || {
        let rate_limit = rate_limit.clone();
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, rate_limit))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{CategoryRepository, GalleryImageRepository, PostRepository, RateLimiter};
use folio_core::service::{CategoryService, GalleryService, PostService};
use folio_infra::auth::{AdminAuthenticator, Argon2PasswordService, JwtTokenService};
use folio_infra::memory::{
    InMemoryCategoryRepository, InMemoryGalleryImageRepository, InMemoryPostRepository,
};
use folio_infra::rate_limit::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub gallery: Arc<GalleryService>,
    pub auth: Arc<AdminAuthenticator>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// `postgres` or `memory`, reported by the health check.
    pub storage: &'static str,
}

/// The three content repositories, backed by one store.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    images: Arc<dyn GalleryImageRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            images: Arc::new(InMemoryGalleryImageRepository::new()),
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        config: &folio_infra::database::DatabaseConfig,
        auto_migrate: bool,
    ) -> Result<Self, migration::DbErr> {
        use folio_infra::database::{
            PostgresCategoryRepository, PostgresGalleryImageRepository, PostgresPostRepository,
            connect,
        };
        use migration::MigratorTrait;

        let conn = Arc::new(connect(config).await?);
        if auto_migrate {
            migration::Migrator::up(&*conn, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self {
            posts: Arc::new(PostgresPostRepository::shared(Arc::clone(&conn))),
            categories: Arc::new(PostgresCategoryRepository::shared(Arc::clone(&conn))),
            images: Arc::new(PostgresGalleryImageRepository::shared(conn)),
            storage: "postgres",
        })
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repositories = match &config.database {
            Some(db) => match Repositories::postgres(db, config.auto_migrate).await {
                Ok(repositories) => repositories,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to initialize database. Using in-memory fallback."
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repositories = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Repositories::in_memory()
        };

        let state = Self::from_repositories(repositories, config);
        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::from_repositories(Repositories::in_memory(), config)
    }

    fn from_repositories(repos: Repositories, config: &AppConfig) -> Self {
        let auth = AdminAuthenticator::new(
            config.admin.clone(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
        );

        Self {
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                config.author.clone(),
            )),
            categories: Arc::new(CategoryService::new(repos.categories, repos.posts)),
            gallery: Arc::new(GalleryService::new(repos.images)),
            auth: Arc::new(auth),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
            storage: repos.storage,
        }
    }
}

//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `auth` - JWT + Argon2 dashboard authentication
//! - `rate-limit` - Per-client rate limiting via governor

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use memory::{
    InMemoryCategoryRepository, InMemoryGalleryImageRepository, InMemoryPostRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresGalleryImageRepository,
    PostgresPostRepository,
};

#[cfg(feature = "auth")]
pub use auth::{AdminAuthenticator, AdminCredentials, Argon2PasswordService, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

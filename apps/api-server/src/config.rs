//! Application configuration loaded from environment variables.

use std::env;

use folio_core::domain::AuthorProfile;
use folio_infra::auth::{AdminCredentials, JwtConfig};
use folio_infra::rate_limit::RateLimitConfig;

#[cfg(feature = "postgres")]
use folio_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations on startup.
    pub auto_migrate: bool,
    /// Attribution for posts that don't name an author.
    pub author: AuthorProfile,
    pub admin: Option<AdminCredentials>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    /// Take the client address from forwarded headers when rate limiting.
    pub trust_proxy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            #[cfg(feature = "postgres")]
            database: None,
            auto_migrate: true,
            author: AuthorProfile::default(),
            admin: None,
            jwt: JwtConfig::default(),
            rate_limit: RateLimitConfig::default(),
            trust_proxy: false,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
            });

        let author = AuthorProfile {
            name: env::var("SITE_AUTHOR_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.author.name),
            avatar: env::var("SITE_AUTHOR_AVATAR").ok().filter(|v| !v.is_empty()),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            #[cfg(feature = "postgres")]
            database,
            auto_migrate: env::var("DB_AUTO_MIGRATE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.auto_migrate),
            author,
            admin: AdminCredentials::from_env(),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            trust_proxy: env::var("TRUST_PROXY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.trust_proxy),
        }
    }
}

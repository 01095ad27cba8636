//! Dashboard authentication.

mod admin;
mod jwt;
mod password;

pub use admin::{ADMIN_ROLE, AdminAuthenticator, AdminCredentials, AdminSession};
pub use jwt::{JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;

//! The single dashboard account.

use std::sync::Arc;

use folio_core::ports::{AuthError, PasswordService, TokenService};

pub const ADMIN_ROLE: &str = "admin";

/// Credentials of the site owner, configured out of band.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl AdminCredentials {
    /// `None` unless both `ADMIN_EMAIL` and `ADMIN_PASSWORD_HASH` are set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty())?;
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            email,
            password_hash,
        })
    }
}

/// Issued on a successful login.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub expires_in: i64,
    pub email: String,
}

/// Checks the admin login and issues tokens carrying the admin role.
pub struct AdminAuthenticator {
    credentials: Option<AdminCredentials>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AdminAuthenticator {
    pub fn new(
        credentials: Option<AdminCredentials>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        if credentials.is_none() {
            tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD_HASH not set, dashboard login disabled");
        }
        Self {
            credentials,
            passwords,
            tokens,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AdminSession, AuthError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;

        // Verify even on an email mismatch so both failures cost the same.
        let password_ok = self.passwords.verify(password, &credentials.password_hash)?;
        if !password_ok || !credentials.email.eq_ignore_ascii_case(email.trim()) {
            tracing::info!("Rejected dashboard login");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .generate_token(&credentials.email, vec![ADMIN_ROLE.to_string()])?;

        Ok(AdminSession {
            token,
            expires_in: self.tokens.expiration_seconds(),
            email: credentials.email.clone(),
        })
    }

    /// Accept only unexpired tokens that carry the admin role.
    pub fn authorize(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.validate_token(token)?;
        if !claims.roles.iter().any(|r| r == ADMIN_ROLE) {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(claims.subject)
    }
}

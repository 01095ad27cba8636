//! Domain-level error types.

use thiserror::Error;

/// Domain errors - the failures an accessor can report to its caller.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-bound input, caught before any store call.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{entity_type} not found: {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    /// A unique constraint (slug, name) would be violated.
    #[error("Duplicate entity: {0}")]
    Conflict(String),

    /// The operation is blocked by a live reference to the entity.
    #[error("Entity is still referenced: {0}")]
    Referential(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A domain rule evaluated inside a store transaction refused the change.
    #[error("{0}")]
    Rejected(Box<DomainError>),
}

impl RepoError {
    /// Convert into a [`DomainError`], attributing `NotFound` and
    /// `Constraint` to the given entity.
    pub fn into_domain(self, entity_type: &'static str, key: impl ToString) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::not_found(entity_type, key),
            RepoError::Constraint(detail) => DomainError::Conflict(detail),
            RepoError::Rejected(err) => *err,
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!(entity = entity_type, error = %msg, "Store operation failed");
                DomainError::Store(msg)
            }
        }
    }
}

impl From<DomainError> for RepoError {
    fn from(err: DomainError) -> Self {
        RepoError::Rejected(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_domain_maps_each_variant() {
        assert!(matches!(
            RepoError::NotFound.into_domain("Post", "abc"),
            DomainError::NotFound { entity_type: "Post", ref key } if key == "abc"
        ));
        assert!(matches!(
            RepoError::Constraint("slug".into()).into_domain("Post", "abc"),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            RepoError::Query("boom".into()).into_domain("Post", "abc"),
            DomainError::Store(_)
        ));

        let rejected: RepoError = DomainError::validation("status", "nope").into();
        assert!(matches!(
            rejected.into_domain("Post", "abc"),
            DomainError::Validation { field: "status", .. }
        ));
    }
}

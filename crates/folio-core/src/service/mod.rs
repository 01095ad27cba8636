//! Content store accessors.
//!
//! One service per entity. Every operation validates its input before
//! touching a repository and reports failures as [`DomainError`]; callers
//! turn that into the uniform `{success, data | error}` envelope.

mod analytics;
mod categories;
mod gallery;
mod posts;

pub use analytics::{CategoryCount, PostStats, PostSummary};
pub use categories::CategoryService;
pub use gallery::GalleryService;
pub use posts::PostService;

use crate::error::{DomainError, RepoError};

/// Map a repository error for `entity`/`key`, phrasing unique violations
/// with `conflict`.
fn store_error<K: ToString>(
    entity: &'static str,
    key: K,
    conflict: impl FnOnce() -> String,
) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::Constraint(detail) => {
            tracing::debug!(entity, %detail, "Unique constraint rejected write");
            DomainError::Conflict(conflict())
        }
        other => other.into_domain(entity, key),
    }
}

fn no_conflict() -> String {
    "unexpected unique constraint violation".to_string()
}

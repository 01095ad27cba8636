use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, GalleryImage, Post, PostEdit};
use crate::error::RepoError;
use crate::query::{Page, QueryPlan};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Execute a query plan.
    async fn list(&self, plan: &QueryPlan) -> Result<Page<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` when absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Counters on a post that readers bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Likes,
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Read the row, apply `edit` and write it back as one atomic step.
    /// A rule violation inside `edit` comes back as `RepoError::Rejected`.
    async fn modify(&self, id: Uuid, edit: &PostEdit, now: DateTime<Utc>)
    -> Result<Post, RepoError>;

    /// Add one to a counter in a single store operation.
    async fn increment(&self, id: Uuid, counter: Counter) -> Result<(), RepoError>;

    /// Number of posts whose category is `name`.
    async fn count_by_category(&self, name: &str) -> Result<u64, RepoError>;

    /// Rewrite the denormalized category name on every referencing post.
    async fn rename_category(&self, from: &str, to: &str) -> Result<u64, RepoError>;

    /// Every post, for dashboard aggregates.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;
}

#[async_trait]
pub trait GalleryImageRepository: BaseRepository<GalleryImage, Uuid> {}

//! In-memory content store - used when no database is configured.
//!
//! Every write happens under one async write lock, so unique checks,
//! read-modify-write edits and counter bumps are atomic with respect to
//! each other. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{Category, GalleryImage, Post, PostEdit};
use folio_core::error::RepoError;
use folio_core::ports::{
    BaseRepository, CategoryRepository, Counter, GalleryImageRepository, PostRepository,
};
use folio_core::query::{Page, QueryPlan, Queryable};

/// A row the in-memory store can hold.
pub trait MemoryRecord: Queryable + Clone + Send + Sync + 'static {
    /// Values that must be unique across the collection, by column name.
    fn unique_keys(&self) -> Vec<(&'static str, &str)>;
}

impl MemoryRecord for Post {
    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("slug", self.slug.as_str())]
    }
}

impl MemoryRecord for Category {
    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("slug", self.slug.as_str())]
    }
}

impl MemoryRecord for GalleryImage {
    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

/// Generic in-memory repository keyed by id.
pub struct MemoryRepository<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

pub type InMemoryPostRepository = MemoryRepository<Post>;
pub type InMemoryCategoryRepository = MemoryRepository<Category>;
pub type InMemoryGalleryImageRepository = MemoryRepository<GalleryImage>;

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `candidate` if another row already holds one of its unique values.
fn check_unique<T: MemoryRecord>(rows: &HashMap<Uuid, T>, candidate: &T) -> Result<(), RepoError> {
    let keys = candidate.unique_keys();
    for other in rows.values().filter(|r| r.id() != candidate.id()) {
        for ((column, value), (_, taken)) in keys.iter().zip(other.unique_keys()) {
            if *value == taken {
                return Err(RepoError::Constraint(format!("{column} '{value}' already exists")));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl<T: MemoryRecord> BaseRepository<T, Uuid> for MemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self, plan: &QueryPlan) -> Result<Page<T>, RepoError> {
        let rows = self.rows.read().await;
        Ok(plan.apply(rows.values().cloned()))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&entity.id()) {
            return Err(RepoError::Constraint(format!("id '{}' already exists", entity.id())));
        }
        check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|p| p.slug == slug).cloned())
    }

    async fn modify(
        &self,
        id: Uuid,
        edit: &PostEdit,
        now: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let current = rows.get(&id).cloned().ok_or(RepoError::NotFound)?;

        let edited = edit.apply(current, now)?;
        check_unique(&rows, &edited)?;
        rows.insert(id, edited.clone());
        Ok(edited)
    }

    async fn increment(&self, id: Uuid, counter: Counter) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let post = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        match counter {
            Counter::Views => post.views += 1,
            Counter::Likes => post.likes += 1,
        }
        Ok(())
    }

    async fn count_by_category(&self, name: &str) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|p| p.category == name).count() as u64)
    }

    async fn rename_category(&self, from: &str, to: &str) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let mut renamed = 0;
        for post in rows.values_mut().filter(|p| p.category == from) {
            post.category = to.to_string();
            renamed += 1;
        }
        Ok(renamed)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|c| c.name == name).cloned())
    }
}

#[async_trait]
impl GalleryImageRepository for InMemoryGalleryImageRepository {}

#[cfg(test)]
mod tests;

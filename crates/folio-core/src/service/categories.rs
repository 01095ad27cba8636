use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, PostRepository};
use crate::query::{CategoryQuery, Page};

use super::store_error;

const ENTITY: &str = "Category";

/// Accessors for categories.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

fn duplicate(name: &str, slug: &str) -> String {
    format!("a category named '{name}' or with slug '{slug}' already exists")
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn list_categories(&self, query: &CategoryQuery) -> Result<Page<Category>, DomainError> {
        self.categories
            .list(&query.plan())
            .await
            .map_err(|e| e.into_domain(ENTITY, "list"))
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn create_category(&self, new: NewCategory) -> Result<Category, DomainError> {
        let category = Category::create(new.validate()?, Utc::now());
        let conflict = duplicate(&category.name, &category.slug);

        let category = self
            .categories
            .insert(category)
            .await
            .map_err(store_error(ENTITY, "new", || conflict))?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Update a category. A rename is carried over to the posts that
    /// reference the old name.
    pub async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Category, DomainError> {
        let changes = changes.validate()?;
        let current = self.get_category(id).await?;
        let old_name = current.name.clone();

        let category = current.apply_changes(&changes, Utc::now());
        let conflict = duplicate(&category.name, &category.slug);
        let category = self
            .categories
            .update(category)
            .await
            .map_err(store_error(ENTITY, id, || conflict))?;

        if category.name != old_name {
            let moved = self
                .posts
                .rename_category(&old_name, &category.name)
                .await
                .map_err(|e| e.into_domain("Post", &old_name))?;
            tracing::info!(
                category_id = %category.id,
                from = %old_name,
                to = %category.name,
                posts = moved,
                "Category renamed"
            );
        }

        tracing::info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    /// Delete a category nobody references. Posts are never cascaded.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        let category = self.get_category(id).await?;

        let in_use = self
            .posts
            .count_by_category(&category.name)
            .await
            .map_err(|e| e.into_domain("Post", &category.name))?;
        if in_use > 0 {
            tracing::warn!(category_id = %id, posts = in_use, "Refusing to delete referenced category");
            return Err(DomainError::Referential(format!(
                "category '{}' is used by {} post(s)",
                category.name, in_use
            )));
        }

        self.categories
            .delete(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::info!(category_id = %id, name = %category.name, "Category deleted");
        Ok(())
    }
}

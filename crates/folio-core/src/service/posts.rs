use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AuthorProfile, NewPost, Post, PostChanges, PostEdit, PostStatus};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, Counter, PostRepository};
use crate::query::{ListParams, Page, PostQuery};

use super::analytics::PostStats;
use super::{no_conflict, store_error};

const ENTITY: &str = "Post";

/// Accessors for blog posts.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    author: AuthorProfile,
}

fn duplicate_slug(slug: &str) -> impl FnOnce() -> String + '_ {
    move || format!("a post with slug '{slug}' already exists")
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        author: AuthorProfile,
    ) -> Self {
        Self {
            posts,
            categories,
            author,
        }
    }

    /// Dashboard listing, any status.
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<Post>, DomainError> {
        let plan = query.plan();
        tracing::debug!(?plan, "Listing posts");
        self.posts
            .list(&plan)
            .await
            .map_err(|e| e.into_domain(ENTITY, "list"))
    }

    /// Public listing; the status filter is forced to published.
    pub async fn list_published_posts(&self, query: PostQuery) -> Result<Page<Post>, DomainError> {
        let query = PostQuery {
            status: Some(PostStatus::Published),
            ..query
        };
        self.list_posts(&query).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await
            .map_err(|e| e.into_domain(ENTITY, slug))?
            .ok_or_else(|| DomainError::not_found(ENTITY, slug))
    }

    /// Slug lookup for readers: unpublished posts don't exist to them.
    pub async fn get_published_post(&self, slug: &str) -> Result<Post, DomainError> {
        match self.get_post_by_slug(slug).await? {
            post if post.is_published() => Ok(post),
            _ => Err(DomainError::not_found(ENTITY, slug)),
        }
    }

    pub async fn create_post(&self, new: NewPost) -> Result<Post, DomainError> {
        let new = new.validate()?;
        self.ensure_category(&new.category).await?;

        let post = Post::create(new, &self.author, Utc::now());
        let slug = post.slug.clone();
        let post = self
            .posts
            .insert(post)
            .await
            .map_err(store_error(ENTITY, &slug, duplicate_slug(&slug)))?;

        tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Post created");
        Ok(post)
    }

    pub async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let changes = changes.validate()?;
        if let Some(category) = &changes.category {
            self.ensure_category(category).await?;
        }

        let slug = changes.slug.clone().unwrap_or_default();
        let post = self
            .posts
            .modify(id, &PostEdit::Update(changes), Utc::now())
            .await
            .map_err(store_error(ENTITY, id, duplicate_slug(&slug)))?;

        tracing::info!(post_id = %post.id, status = %post.status, "Post updated");
        Ok(post)
    }

    pub async fn archive_post(&self, id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .modify(id, &PostEdit::Archive, Utc::now())
            .await
            .map_err(store_error(ENTITY, id, no_conflict))?;

        tracing::info!(post_id = %post.id, "Post archived");
        Ok(post)
    }

    /// Bring an archived post back as `target` (draft or published).
    pub async fn restore_post(&self, id: Uuid, target: PostStatus) -> Result<Post, DomainError> {
        if target == PostStatus::Archived {
            return Err(DomainError::validation(
                "status",
                "restore target must be draft or published",
            ));
        }

        let post = self
            .posts
            .modify(id, &PostEdit::Restore(target), Utc::now())
            .await
            .map_err(store_error(ENTITY, id, no_conflict))?;

        tracing::info!(post_id = %post.id, status = %post.status, "Post restored");
        Ok(post)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn increment_views(&self, id: Uuid) -> Result<(), DomainError> {
        self.bump(id, Counter::Views).await
    }

    pub async fn increment_likes(&self, id: Uuid) -> Result<(), DomainError> {
        self.bump(id, Counter::Likes).await
    }

    async fn bump(&self, id: Uuid, counter: Counter) -> Result<(), DomainError> {
        self.posts
            .increment(id, counter)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::debug!(post_id = %id, ?counter, "Counter incremented");
        Ok(())
    }

    /// Newest published posts sharing the category of `slug`, excluding it.
    pub async fn related_posts(&self, slug: &str, limit: u64) -> Result<Vec<Post>, DomainError> {
        let post = self.get_published_post(slug).await?;

        let query = PostQuery {
            category: Some(post.category.clone()),
            status: Some(PostStatus::Published),
            params: ListParams {
                sort_by: Some("publishedAt".to_string()),
                sort_order: Some("desc".to_string()),
                page: Some(1),
                limit: Some(limit.saturating_add(1)),
            },
            ..Default::default()
        };
        let page = self.list_posts(&query).await?;

        let related = page
            .items
            .into_iter()
            .filter(|p| p.id != post.id)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();
        Ok(related)
    }

    /// Dashboard analytics over every post.
    pub async fn post_stats(&self) -> Result<PostStats, DomainError> {
        let posts = self
            .posts
            .find_all()
            .await
            .map_err(|e| e.into_domain(ENTITY, "all"))?;
        Ok(PostStats::from_posts(posts))
    }

    async fn ensure_category(&self, name: &str) -> Result<(), DomainError> {
        let exists = self
            .categories
            .find_by_name(name)
            .await
            .map_err(|e| e.into_domain("Category", name))?
            .is_some();

        if !exists {
            return Err(DomainError::validation(
                "category",
                format!("'{name}' is not an existing category"),
            ));
        }
        Ok(())
    }
}

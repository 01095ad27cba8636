use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::query::{Field, Queryable, SortKey};
use crate::text::{normalize_tags, reading_time, slugify};
use crate::validation;

pub const TITLE_MAX: usize = 200;
pub const EXCERPT_MAX: usize = 500;
pub const CONTENT_MAX: usize = 200_000;
pub const CATEGORY_MAX: usize = 50;
pub const AUTHOR_MAX: usize = 100;
pub const TAG_MAX: usize = 50;

/// Lifecycle of a post.
///
/// `draft -> published -> archived`, and archived posts only leave through
/// an explicit restore to draft or published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::validation(
                "status",
                format!("'{other}' is not one of draft, published, archived"),
            )),
        }
    }
}

/// Post entity - a blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub author_name: String,
    pub author_avatar: Option<String>,
    /// Name of the category, copied rather than referenced by id.
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    /// Null until the first publish.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Minutes, recomputed whenever `content` changes.
    pub reading_time: i32,
    pub views: i64,
    pub likes: i64,
}

/// Who a post is attributed to when the payload doesn't say.
#[derive(Debug, Clone)]
pub struct AuthorProfile {
    pub name: String,
    pub avatar: Option<String>,
}

impl Default for AuthorProfile {
    fn default() -> Self {
        Self {
            name: "Site Owner".to_string(),
            avatar: None,
        }
    }
}

/// Payload for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    /// Defaults to draft.
    pub status: Option<PostStatus>,
}

/// Payload for updating a post. `None` keeps the stored value; the nested
/// options on nullable fields distinguish "clear" from "keep".
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub author_name: Option<String>,
    pub author_avatar: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

/// A state change applied to a stored post inside one store transaction.
#[derive(Debug, Clone)]
pub enum PostEdit {
    Update(PostChanges),
    Archive,
    Restore(PostStatus),
}

impl PostEdit {
    pub fn apply(&self, post: Post, now: DateTime<Utc>) -> Result<Post, DomainError> {
        match self {
            PostEdit::Update(changes) => post.apply_changes(changes, now),
            PostEdit::Archive => Ok(post.archive(now)),
            PostEdit::Restore(target) => post.restore(*target, now),
        }
    }
}

fn validate_images(images: Vec<String>) -> Result<Vec<String>, DomainError> {
    images
        .iter()
        .map(|i| validation::media_ref("images", i))
        .collect()
}

fn validate_tags(tags: Vec<String>) -> Result<Vec<String>, DomainError> {
    let tags = normalize_tags(tags);
    if tags.is_empty() {
        return Err(DomainError::validation("tags", "at least one tag is required"));
    }
    validation::tags("tags", &tags, TAG_MAX)?;
    Ok(tags)
}

fn validate_slug_or_derive(slug: Option<&str>, title: &str) -> Result<String, DomainError> {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => validation::slug("slug", slug),
        None => {
            let derived = slugify(title);
            if derived.is_empty() {
                return Err(DomainError::validation(
                    "title",
                    "must contain at least one letter or digit",
                ));
            }
            Ok(derived)
        }
    }
}

impl NewPost {
    /// Check bounds and formats, returning the normalized payload.
    pub fn validate(self) -> Result<Self, DomainError> {
        let title = validation::required_text("title", &self.title, TITLE_MAX)?;
        let slug = validate_slug_or_derive(self.slug.as_deref(), &title)?;

        if self.status == Some(PostStatus::Archived) {
            return Err(DomainError::validation(
                "status",
                "a new post must be draft or published",
            ));
        }

        Ok(Self {
            slug: Some(slug),
            excerpt: validation::required_text("excerpt", &self.excerpt, EXCERPT_MAX)?,
            content: validation::required_text("content", &self.content, CONTENT_MAX)?,
            featured_image: validation::optional_media_ref(
                "featuredImage",
                self.featured_image.as_deref(),
            )?,
            images: validate_images(self.images)?,
            author_name: validation::optional_text(
                "authorName",
                self.author_name.as_deref(),
                AUTHOR_MAX,
            )?,
            author_avatar: validation::optional_media_ref(
                "authorAvatar",
                self.author_avatar.as_deref(),
            )?,
            category: validation::required_text("category", &self.category, CATEGORY_MAX)?,
            tags: validate_tags(self.tags)?,
            title,
            status: self.status,
        })
    }
}

impl PostChanges {
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self
                .title
                .map(|t| validation::required_text("title", &t, TITLE_MAX))
                .transpose()?,
            slug: self.slug.map(|s| validation::slug("slug", &s)).transpose()?,
            excerpt: self
                .excerpt
                .map(|e| validation::required_text("excerpt", &e, EXCERPT_MAX))
                .transpose()?,
            content: self
                .content
                .map(|c| validation::required_text("content", &c, CONTENT_MAX))
                .transpose()?,
            featured_image: self
                .featured_image
                .map(|img| validation::optional_media_ref("featuredImage", img.as_deref()))
                .transpose()?,
            images: self.images.map(validate_images).transpose()?,
            author_name: self
                .author_name
                .map(|n| validation::required_text("authorName", &n, AUTHOR_MAX))
                .transpose()?,
            author_avatar: self
                .author_avatar
                .map(|a| validation::optional_media_ref("authorAvatar", a.as_deref()))
                .transpose()?,
            category: self
                .category
                .map(|c| validation::required_text("category", &c, CATEGORY_MAX))
                .transpose()?,
            tags: self.tags.map(validate_tags).transpose()?,
            status: self.status,
        })
    }
}

impl Post {
    /// Build a post from a payload that has already been validated.
    pub fn create(new: NewPost, author: &AuthorProfile, now: DateTime<Utc>) -> Self {
        let status = new.status.unwrap_or(PostStatus::Draft);
        let slug = new.slug.unwrap_or_else(|| slugify(&new.title));

        Self {
            id: Uuid::new_v4(),
            reading_time: reading_time(&new.content),
            title: new.title,
            slug,
            excerpt: new.excerpt,
            content: new.content,
            featured_image: new.featured_image,
            images: new.images,
            author_name: new.author_name.unwrap_or_else(|| author.name.clone()),
            author_avatar: new.author_avatar.or_else(|| author.avatar.clone()),
            category: new.category,
            tags: new.tags,
            status,
            published_at: (status == PostStatus::Published).then_some(now),
            created_at: now,
            updated_at: now,
            views: 0,
            likes: 0,
        }
    }

    pub fn apply_changes(mut self, changes: &PostChanges, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if let Some(status) = changes.status {
            if self.status == PostStatus::Archived && status != PostStatus::Archived {
                return Err(DomainError::validation(
                    "status",
                    "archived posts must be restored before changing status",
                ));
            }
            self.status = status;
            if status == PostStatus::Published && self.published_at.is_none() {
                self.published_at = Some(now);
            }
        }

        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(excerpt) = &changes.excerpt {
            self.excerpt = excerpt.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
            self.reading_time = reading_time(content);
        }
        if let Some(featured_image) = &changes.featured_image {
            self.featured_image = featured_image.clone();
        }
        if let Some(images) = &changes.images {
            self.images = images.clone();
        }
        if let Some(author_name) = &changes.author_name {
            self.author_name = author_name.clone();
        }
        if let Some(author_avatar) = &changes.author_avatar {
            self.author_avatar = author_avatar.clone();
        }
        if let Some(category) = &changes.category {
            self.category = category.clone();
        }
        if let Some(tags) = &changes.tags {
            self.tags = tags.clone();
        }

        self.updated_at = now;
        Ok(self)
    }

    /// Move to archived; `published_at` is left as it was.
    pub fn archive(mut self, now: DateTime<Utc>) -> Self {
        self.status = PostStatus::Archived;
        self.updated_at = now;
        self
    }

    /// Bring an archived post back as a draft (clearing `published_at`) or
    /// as published (stamping it with `now`).
    pub fn restore(mut self, target: PostStatus, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if self.status != PostStatus::Archived {
            return Err(DomainError::validation(
                "status",
                format!("only archived posts can be restored, this one is {}", self.status),
            ));
        }
        self.published_at = match target {
            PostStatus::Draft => None,
            PostStatus::Published => Some(now),
            PostStatus::Archived => {
                return Err(DomainError::validation(
                    "status",
                    "restore target must be draft or published",
                ));
            }
        };
        self.status = target;
        self.updated_at = now;
        Ok(self)
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

impl Queryable for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => Some(&self.title),
            Field::Slug => Some(&self.slug),
            Field::Excerpt => Some(&self.excerpt),
            Field::Content => Some(&self.content),
            Field::Category => Some(&self.category),
            Field::Status => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn tags(&self, field: Field) -> &[String] {
        match field {
            Field::Tags => &self.tags,
            _ => &[],
        }
    }

    fn sort_key(&self, field: Field) -> Option<SortKey<'_>> {
        match field {
            Field::Id => Some(SortKey::Id(self.id)),
            Field::Title => Some(SortKey::Text(&self.title)),
            Field::CreatedAt => Some(SortKey::Time(self.created_at)),
            Field::UpdatedAt => Some(SortKey::Time(self.updated_at)),
            Field::PublishedAt => self.published_at.map(SortKey::Time),
            Field::Views => Some(SortKey::Number(self.views)),
            Field::Likes => Some(SortKey::Number(self.likes)),
            _ => None,
        }
    }
}

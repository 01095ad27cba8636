use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::query::{Field, Queryable, SortKey};
use crate::text::normalize_tags;
use crate::validation;

pub const FILENAME_MAX: usize = 255;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const TAG_MAX: usize = 50;

/// Gallery image entity - metadata for an uploaded asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: Uuid,
    pub url: String,
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Bytes.
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the upload service hands back, plus author-supplied metadata.
#[derive(Debug, Clone, Default)]
pub struct NewGalleryImage {
    pub url: String,
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub tags: Vec<String>,
    /// Defaults to the creation time.
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct GalleryImageChanges {
    pub url: Option<String>,
    pub filename: Option<String>,
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

fn validate_tags(tags: Vec<String>) -> Result<Vec<String>, DomainError> {
    let tags = normalize_tags(tags);
    validation::tags("tags", &tags, TAG_MAX)?;
    Ok(tags)
}

impl NewGalleryImage {
    pub fn validate(self) -> Result<Self, DomainError> {
        if self.size < 0 {
            return Err(DomainError::validation("size", "must not be negative"));
        }

        Ok(Self {
            url: validation::media_ref("url", &self.url)?,
            filename: validation::required_text("filename", &self.filename, FILENAME_MAX)?,
            title: validation::optional_text("title", self.title.as_deref(), TITLE_MAX)?,
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                DESCRIPTION_MAX,
            )?,
            size: self.size,
            width: validation::positive("width", self.width)?,
            height: validation::positive("height", self.height)?,
            tags: validate_tags(self.tags)?,
            uploaded_at: self.uploaded_at,
        })
    }
}

impl GalleryImageChanges {
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            url: self
                .url
                .map(|u| validation::media_ref("url", &u))
                .transpose()?,
            filename: self
                .filename
                .map(|f| validation::required_text("filename", &f, FILENAME_MAX))
                .transpose()?,
            title: self
                .title
                .map(|t| validation::optional_text("title", t.as_deref(), TITLE_MAX))
                .transpose()?,
            description: self
                .description
                .map(|d| validation::optional_text("description", d.as_deref(), DESCRIPTION_MAX))
                .transpose()?,
            tags: self.tags.map(validate_tags).transpose()?,
        })
    }
}

impl GalleryImage {
    pub fn create(new: NewGalleryImage, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: new.url,
            filename: new.filename,
            title: new.title,
            description: new.description,
            size: new.size,
            width: new.width,
            height: new.height,
            tags: new.tags,
            uploaded_at: new.uploaded_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(mut self, changes: &GalleryImageChanges, now: DateTime<Utc>) -> Self {
        if let Some(url) = &changes.url {
            self.url = url.clone();
        }
        if let Some(filename) = &changes.filename {
            self.filename = filename.clone();
        }
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(tags) = &changes.tags {
            self.tags = tags.clone();
        }
        self.updated_at = now;
        self
    }
}

impl Queryable for GalleryImage {
    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::Filename => Some(&self.filename),
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
            Field::Title => self.title.as_deref().map(SortKey::Text),
            Field::Filename => Some(SortKey::Text(&self.filename)),
            Field::Size => Some(SortKey::Number(self.size)),
            Field::CreatedAt => Some(SortKey::Time(self.created_at)),
            Field::UploadedAt => Some(SortKey::Time(self.uploaded_at)),
            _ => None,
        }
    }
}

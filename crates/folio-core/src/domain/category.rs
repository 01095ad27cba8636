use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::query::{Field, Queryable, SortKey};
use crate::text::slugify;
use crate::validation;

pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 500;
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Category entity - posts point at it by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// `#rrggbb`
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(self) -> Result<Self, DomainError> {
        let name = validation::required_text("name", &self.name, NAME_MAX)?;
        let slug = match self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => validation::slug("slug", slug)?,
            None => {
                let derived = slugify(&name);
                if derived.is_empty() {
                    return Err(DomainError::validation(
                        "name",
                        "must contain at least one letter or digit",
                    ));
                }
                derived
            }
        };

        Ok(Self {
            name,
            slug: Some(slug),
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                DESCRIPTION_MAX,
            )?,
            color: self
                .color
                .map(|c| validation::color("color", &c))
                .transpose()?,
        })
    }
}

impl CategoryChanges {
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            name: self
                .name
                .map(|n| validation::required_text("name", &n, NAME_MAX))
                .transpose()?,
            slug: self.slug.map(|s| validation::slug("slug", &s)).transpose()?,
            description: self
                .description
                .map(|d| validation::optional_text("description", d.as_deref(), DESCRIPTION_MAX))
                .transpose()?,
            color: self
                .color
                .map(|c| validation::color("color", &c))
                .transpose()?,
        })
    }
}

impl Category {
    /// Build a category from a validated payload.
    pub fn create(new: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: new.slug.unwrap_or_else(|| slugify(&new.name)),
            name: new.name,
            description: new.description,
            color: new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(mut self, changes: &CategoryChanges, now: DateTime<Utc>) -> Self {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(color) = &changes.color {
            self.color = color.clone();
        }
        self.updated_at = now;
        self
    }
}

impl Queryable for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Slug => Some(&self.slug),
            Field::Description => self.description.as_deref(),
            _ => None,
        }
    }

    fn sort_key(&self, field: Field) -> Option<SortKey<'_>> {
        match field {
            Field::Id => Some(SortKey::Id(self.id)),
            Field::Name => Some(SortKey::Text(&self.name)),
            Field::CreatedAt => Some(SortKey::Time(self.created_at)),
            Field::UpdatedAt => Some(SortKey::Time(self.updated_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_derives_slug_and_default_color() {
        let new = NewCategory {
            name: " Book Reviews ".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let category = Category::create(new, Utc::now());
        assert_eq!(category.name, "Book Reviews");
        assert_eq!(category.slug, "book-reviews");
        assert_eq!(category.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let result = NewCategory {
            name: "News".to_string(),
            color: Some("blue".to_string()),
            ..Default::default()
        }
        .validate();
        assert!(matches!(
            result,
            Err(DomainError::Validation { field: "color", .. })
        ));
    }

    #[test]
    fn test_changes_keep_omitted_fields() {
        let category = Category::create(
            NewCategory {
                name: "News".to_string(),
                description: Some("Updates".to_string()),
                ..Default::default()
            }
            .validate()
            .unwrap(),
            Utc::now(),
        );
        let changes = CategoryChanges {
            color: Some("#FF0000".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let updated = category.clone().apply_changes(&changes, Utc::now());
        assert_eq!(updated.color, "#ff0000");
        assert_eq!(updated.name, category.name);
        assert_eq!(updated.description, category.description);
    }
}

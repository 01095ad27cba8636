//! Data Transfer Objects - request types for the API.
//!
//! Field names are camelCase on the wire. Update requests distinguish an
//! absent field (keep) from an explicit `null` (clear) on nullable fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Wrap any present value, `null` included, in `Some` so that
/// `Option<Option<T>>` tells "absent" from "null" apart.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Sorting and paging query parameters shared by every listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// `?category=&status=&tag=&search=` plus sorting and paging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub list: ListQuery,
}

impl PostListQuery {
    /// The category filter; the UI sends `all` for "no filter".
    pub fn category(&self) -> Option<String> {
        selected(&self.category)
    }

    /// The status filter; `all` means none.
    pub fn status(&self) -> Option<String> {
        selected(&self.status)
    }
}

fn selected(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListQuery {
    pub search: Option<String>,
    #[serde(flatten)]
    pub list: ListQuery,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub list: ListQuery,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub featured_image: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub author_avatar: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Target state when bringing a post out of the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorePostRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

/// Metadata for an image the upload service has already stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
    pub url: String,
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageRequest {
    pub url: Option<String>,
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

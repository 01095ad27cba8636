//! Field validators used by the content payloads.
//!
//! Each validator returns the normalized value or a
//! [`DomainError::Validation`] naming the offending field.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::DomainError;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern compiles"));

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern compiles"));

/// Trim and require a non-empty string of at most `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(value.to_string())
}

/// Like [`required_text`], but blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

pub fn slug(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.len() > 128 || !SLUG_RE.is_match(value) {
        return Err(DomainError::validation(
            field,
            "must be lowercase letters, digits and single hyphens",
        ));
    }
    Ok(value.to_string())
}

/// A `#RRGGBB` color code, normalized to lowercase.
pub fn color(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if !COLOR_RE.is_match(value) {
        return Err(DomainError::validation(
            field,
            "must be a hex color like #1a2b3c",
        ));
    }
    Ok(value.to_ascii_lowercase())
}

/// A reference to a stored asset: an absolute http(s) URL or a site-rooted
/// path such as `/uploads/cover.jpg`.
pub fn media_ref(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.starts_with('/') && !value.starts_with("//") && !value.contains(char::is_whitespace)
    {
        return Ok(value.to_string());
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(value.to_string())
        }
        _ => Err(DomainError::validation(
            field,
            "must be an http(s) URL or a path starting with /",
        )),
    }
}

pub fn optional_media_ref(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => media_ref(field, v).map(Some),
    }
}

/// Validate each tag's length; emptiness of the list is the caller's call.
pub fn tags(field: &'static str, tags: &[String], max_len: usize) -> Result<(), DomainError> {
    match tags.iter().find(|t| t.chars().count() > max_len) {
        Some(tag) => Err(DomainError::validation(
            field,
            format!("tag '{tag}' is longer than {max_len} characters"),
        )),
        None => Ok(()),
    }
}

pub fn positive(field: &'static str, value: Option<i32>) -> Result<Option<i32>, DomainError> {
    match value {
        Some(v) if v <= 0 => Err(DomainError::validation(field, "must be positive")),
        other => Ok(other),
    }
}

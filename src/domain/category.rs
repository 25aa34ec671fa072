//! Product categories, optionally nested under a parent.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Home & Garden")]
    pub name: String,
    #[schema(example = "home-garden")]
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<Uuid>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin create/update payload.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct CategoryInput {
    #[schema(example = "Home & Garden")]
    pub name: String,
    /// Derived from `name` when omitted
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryInput {
    /// Validate the payload and return the slug to store.
    pub fn resolve_slug(&self) -> AppResult<String> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Category name is required"));
        }

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&self.name),
        };

        if !SLUG_PATTERN.is_match(&slug) {
            return Err(AppError::validation(format!(
                "Invalid slug '{}': use lowercase letters, digits and single hyphens",
                slug
            )));
        }
        Ok(slug)
    }
}

/// Lowercase the name and collapse every run of non-alphanumerics to one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

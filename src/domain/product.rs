//! Product catalog entity, write model and listing filter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::{DEFAULT_FEATURED_LIMIT, MAX_FEATURED_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::types::{lenient, lenient_bool, PaginationParams};

string_enum! {
    /// Publication state of a product
    ProductStatus("product status") {
        Draft => "draft",
        Active => "active",
        Inactive => "inactive",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    /// Short sequential identifier, accepted wherever a product id is
    #[schema(example = 12)]
    pub numeric_id: i32,
    pub vendor_id: Option<Uuid>,
    #[schema(example = "Noise Cancelling Headphones")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 199.99)]
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub sku: Option<String>,
    #[schema(example = "electronics")]
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub status: ProductStatus,
    pub featured: bool,
    pub weight: Option<Decimal>,
    pub dimensions: Option<Dimensions>,
    pub seo: Option<Seo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_owned_by(&self, vendor_id: Uuid) -> bool {
        self.vendor_id == Some(vendor_id)
    }
}

/// Full product write model used for create and update.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct ProductInput {
    #[schema(example = "Noise Cancelling Headphones")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 199.99)]
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub sku: Option<String>,
    #[schema(example = "electronics")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i32,
    /// Defaults to `draft` on create
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub featured: bool,
    pub weight: Option<Decimal>,
    pub dimensions: Option<Dimensions>,
    pub seo: Option<Seo>,
}

impl ProductInput {
    /// Enforce the catalog rules: name and category present, price > 0, stock >= 0.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if self.price <= Decimal::ZERO {
            return Err(AppError::validation("Product price must be greater than 0"));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::validation("Product category is required"));
        }
        if self.stock < 0 {
            return Err(AppError::validation("Stock cannot be negative"));
        }
        if matches!(self.compare_price, Some(p) if p <= Decimal::ZERO) {
            return Err(AppError::validation("Compare price must be greater than 0"));
        }
        if matches!(self.weight, Some(w) if w < Decimal::ZERO) {
            return Err(AppError::validation("Weight cannot be negative"));
        }
        Ok(())
    }

    pub fn status_or_default(&self) -> ProductStatus {
        self.status.unwrap_or(ProductStatus::Draft)
    }
}

/// How a product was addressed in a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLookup {
    Id(Uuid),
    Numeric(i32),
}

impl ProductLookup {
    /// Accepts a UUID or a positive numeric id; anything else is `INVALID_ID`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if let Ok(id) = Uuid::parse_str(raw) {
            return Ok(ProductLookup::Id(id));
        }
        match raw.parse::<i32>() {
            Ok(n) if n > 0 => Ok(ProductLookup::Numeric(n)),
            _ => Err(AppError::invalid("INVALID_ID", "Invalid product ID")),
        }
    }
}

/// Sortable product columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(SortField::Name),
            "price" => Some(SortField::Price),
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Resolved ordering for a product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrdering {
    /// No sort requested: newest first, or best match for searches
    Default,
    By(SortField, SortDirection),
}

/// Listing filter parsed from the query string.
///
/// Blank or unparseable values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Exact category match
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<ProductStatus>,
    /// `true`/`false`, `1`/`0` or `t`/`f`
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_price: Option<Decimal>,
    /// Set by the vendor routes, never from the query string
    #[serde(skip)]
    #[param(ignore)]
    pub vendor_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    /// One of name, price, created_at, updated_at
    pub sort_by: Option<String>,
    /// `desc` for descending, anything else ascending
    pub sort_dir: Option<String>,
}

impl ProductFilter {
    pub fn page(&self) -> u64 {
        self.pagination.page()
    }

    pub fn limit(&self) -> u64 {
        self.pagination.limit()
    }

    pub fn offset(&self) -> u64 {
        self.pagination.offset()
    }

    /// Unknown sort fields fall back to newest first; direction is
    /// descending only when `sort_dir` is exactly `desc`.
    pub fn ordering(&self) -> ProductOrdering {
        let Some(sort_by) = self.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            return ProductOrdering::Default;
        };

        match SortField::parse(sort_by) {
            Some(field) => {
                let direction = if self.sort_dir.as_deref() == Some("desc") {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                ProductOrdering::By(field, direction)
            }
            None => ProductOrdering::By(SortField::CreatedAt, SortDirection::Desc),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Restrict to one vendor; category is cleared for vendor listings.
    pub fn for_vendor(mut self, vendor_id: Uuid) -> Self {
        self.category = None;
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::validation(
                    "min_price cannot be greater than max_price",
                ));
            }
        }
        Ok(())
    }
}

/// Clamp a requested featured-products limit into 1..=50, defaulting to 10.
pub fn featured_limit(requested: Option<i64>) -> u64 {
    match requested {
        Some(n) if n > 0 => (n as u64).min(MAX_FEATURED_LIMIT),
        _ => DEFAULT_FEATURED_LIMIT,
    }
}

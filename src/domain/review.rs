//! Customer product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = 5)]
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    /// Set when the reviewer bought the product
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ReviewInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 4)]
    pub rating: i32,
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,
    pub comment: Option<String>,
}

/// Edit of an existing review; the product cannot change
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ReviewChanges {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,
    pub comment: Option<String>,
}

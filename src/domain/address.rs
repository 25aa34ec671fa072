//! Postal address value object, stored as JSON on vendors and orders.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1, message = "Street is required"))]
    #[schema(example = "1 Market St")]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    #[schema(example = "San Francisco")]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    #[schema(example = "CA")]
    pub state: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    #[schema(example = "94105")]
    pub postal_code: String,
    #[validate(length(min = 2, message = "Country is required"))]
    #[schema(example = "US")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

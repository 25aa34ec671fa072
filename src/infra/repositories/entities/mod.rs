//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enum columns are stored as text and JSON columns as `jsonb`.

use sea_orm::entity::prelude::Json;
use serde::{de::DeserializeOwned, Serialize};

pub mod cart;
pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod user;
pub mod vendor;

/// Decode an optional JSON column, dropping values that no longer fit the type.
pub(crate) fn from_json<T: DeserializeOwned>(value: Option<Json>) -> Option<T> {
    value.and_then(|v| serde_json::from_value(v).ok())
}

pub(crate) fn to_json<T: Serialize>(value: Option<&T>) -> Option<Json> {
    value.and_then(|v| serde_json::to_value(v).ok())
}

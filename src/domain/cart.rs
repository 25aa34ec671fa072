//! Shopping cart, owned by a signed-in customer or an anonymous session.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Product;

/// Who a cart belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    Customer(Uuid),
    Session(String),
}

impl CartOwner {
    pub fn customer_id(&self) -> Option<Uuid> {
        match self {
            CartOwner::Customer(id) => Some(*id),
            CartOwner::Session(_) => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            CartOwner::Customer(_) => None,
            CartOwner::Session(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Current catalog entry; absent if the product was removed
    pub product: Option<Product>,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.product
            .as_ref()
            .map(|p| p.price * Decimal::from(self.quantity))
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub session_id: Option<String>,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Build a cart view, computing subtotal and item count from the items.
    pub fn assemble(
        id: Uuid,
        owner: &CartOwner,
        items: Vec<CartItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let subtotal = items.iter().map(CartItem::line_total).sum();
        let item_count = items.iter().map(|i| i.quantity).sum();

        Self {
            id,
            customer_id: owner.customer_id(),
            session_id: owner.session_id().map(str::to_string),
            items,
            subtotal,
            item_count,
            created_at,
            updated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddCartItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItem {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1)]
    pub quantity: i32,
}

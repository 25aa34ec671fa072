//! Orders and their fulfilment lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::Address;
use crate::errors::{AppError, AppResult};
use crate::types::lenient;

string_enum! {
    /// Fulfilment state of an order
    OrderStatus("order status") {
        Pending => "pending",
        Confirmed => "confirmed",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
        Refunded => "refunded",
    }
}

impl OrderStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Processing)
                | (Confirmed, Cancelled)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Delivered, Refunded)
        )
    }

    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    /// Checked transition, reporting `INVALID_STATUS_TRANSITION` otherwise.
    pub fn transition(self, next: OrderStatus) -> AppResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::invalid(
                "INVALID_STATUS_TRANSITION",
                format!("Cannot change order status from {} to {}", self, next),
            ))
        }
    }
}

string_enum! {
    PaymentStatus("payment status") {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
        Cancelled => "cancelled",
    }
}

/// Line snapshot taken when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "SM-20240101-0001")]
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub stripe_payment_id: Option<String>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    #[schema(example = "usd")]
    pub currency: String,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn belongs_to(&self, customer_id: Uuid) -> bool {
        self.customer_id == customer_id
    }

    pub fn includes_vendor(&self, vendor_id: Uuid) -> bool {
        self.items.iter().any(|i| i.vendor_id == Some(vendor_id))
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Admin order listing filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderStatusFilter {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(Refunded));

        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Delivered));
    }

    #[test]
    fn test_only_early_orders_cancellable() {
        let cancellable: Vec<_> = OrderStatus::ALL
            .iter()
            .filter(|s| s.is_cancellable())
            .copied()
            .collect();
        assert_eq!(cancellable, vec![OrderStatus::Pending, OrderStatus::Confirmed]);
    }

    #[test]
    fn test_rejected_transition_code() {
        let err = OrderStatus::Processing
            .transition(OrderStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATUS_TRANSITION");
    }
}

//! Hosted checkout request/response types and payment webhook events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: String,
    #[schema(example = "Wireless Mouse")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = 29.99)]
    pub price: Decimal,
    #[schema(example = 1)]
    pub quantity: i64,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct CheckoutAddress {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    #[schema(example = "buyer@example.com")]
    pub customer_email: String,
    pub customer_info: Option<CustomerInfo>,
    pub shipping_address: Option<CheckoutAddress>,
    pub billing_address: Option<CheckoutAddress>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl CheckoutRequest {
    /// Reject empty carts, missing e-mails and unpriced or zero-quantity items.
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::invalid(
                "EMPTY_CART",
                "Cart must contain at least one item",
            ));
        }

        let email = self.customer_email.trim();
        if email.is_empty() {
            return Err(AppError::invalid(
                "MISSING_EMAIL",
                "Customer email is required for checkout",
            ));
        }
        if !email.validate_email() {
            return Err(AppError::invalid("INVALID_EMAIL", "Customer email is invalid"));
        }

        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(AppError::invalid("INVALID_ITEM", "Every item needs a name"));
            }
            if item.price <= Decimal::ZERO {
                return Err(AppError::invalid(
                    "INVALID_ITEM",
                    format!("Item '{}' must have a price greater than 0", item.name),
                ));
            }
            if item.quantity <= 0 {
                return Err(AppError::invalid(
                    "INVALID_ITEM",
                    format!("Item '{}' must have a quantity greater than 0", item.name),
                ));
            }
        }
        Ok(())
    }

    /// Customer names plus a street and city switch checkout to the
    /// prefilled flow with shipping options.
    pub fn is_full_info(&self) -> bool {
        let (Some(customer), Some(shipping)) = (&self.customer_info, &self.shipping_address)
        else {
            return false;
        };

        [
            &customer.first_name,
            &customer.last_name,
            &shipping.address_line1,
            &shipping.city,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// E-mail sent to the processor: the customer's own when given.
    pub fn effective_email(&self) -> &str {
        match &self.customer_info {
            Some(info) if self.is_full_info() && !info.email.trim().is_empty() => &info.email,
            _ => &self.customer_email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSession {
    #[schema(example = "cs_test_a1b2c3")]
    pub session_id: String,
    pub session_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// Verified payment processor event
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

impl WebhookEvent {
    /// Id of the object the event describes.
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CheckoutRequest {
        serde_json::from_value(body).unwrap()
    }

    fn item() -> serde_json::Value {
        json!({"product_id": "1", "name": "Mouse", "price": 29.99, "quantity": 1})
    }

    #[test]
    fn test_empty_cart_rejected_first() {
        let err = request(json!({"items": []})).validate().unwrap_err();
        assert_eq!(err.code(), "EMPTY_CART");
    }

    #[test]
    fn test_missing_email() {
        let err = request(json!({"items": [item()]})).validate().unwrap_err();
        assert_eq!(err.code(), "MISSING_EMAIL");
    }

    #[test]
    fn test_item_rules() {
        let zero_qty = request(json!({
            "items": [{"product_id": "1", "name": "Mouse", "price": 5, "quantity": 0}],
            "customer_email": "a@b.co"
        }));
        assert_eq!(zero_qty.validate().unwrap_err().code(), "INVALID_ITEM");

        let free = request(json!({
            "items": [{"product_id": "1", "name": "Mouse", "price": 0, "quantity": 1}],
            "customer_email": "a@b.co"
        }));
        assert_eq!(free.validate().unwrap_err().code(), "INVALID_ITEM");

        let ok = request(json!({"items": [item()], "customer_email": "a@b.co"}));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_full_info_detection() {
        let simple = request(json!({"items": [item()], "customer_email": "a@b.co"}));
        assert!(!simple.is_full_info());

        let full = request(json!({
            "items": [item()],
            "customer_email": "a@b.co",
            "customer_info": {"first_name": "Ada", "last_name": "Lovelace", "email": "ada@x.io"},
            "shipping_address": {"address_line1": "1 Main St", "city": "London"}
        }));
        assert!(full.is_full_info());
        assert_eq!(full.effective_email(), "ada@x.io");

        let no_city = request(json!({
            "items": [item()],
            "customer_email": "a@b.co",
            "customer_info": {"first_name": "Ada", "last_name": "Lovelace"},
            "shipping_address": {"address_line1": "1 Main St", "city": " "}
        }));
        assert!(!no_city.is_full_info());
        assert_eq!(no_city.effective_email(), "a@b.co");
    }

    #[test]
    fn test_webhook_event_parsing() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {"id": "cs_123", "object": "checkout.session"}}
        }))
        .unwrap();

        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.object_id(), Some("cs_123"));
    }
}

//! Payment service - Hosted checkout sessions and processor webhooks.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::{CheckoutRequest, CheckoutSession, WebhookEvent};
use crate::errors::AppResult;
use crate::infra::PaymentGateway;

pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Validate the cart snapshot and open a hosted checkout session
    async fn create_checkout(&self, request: CheckoutRequest) -> AppResult<CheckoutSession>;

    /// Verify and dispatch a raw webhook delivery
    async fn handle_webhook(&self, payload: &[u8], signature: &str) -> AppResult<()>;
}

pub struct PaymentProcessor {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentProcessor {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    fn dispatch(&self, event: &WebhookEvent) {
        let object_id = event.object_id().unwrap_or_default();

        match event.event_type.as_str() {
            EVENT_CHECKOUT_COMPLETED => {
                // TODO: persist the paid order from the session's line items and metadata
                info!(event_id = %event.id, session_id = object_id, "Checkout session completed");
            }
            EVENT_PAYMENT_SUCCEEDED => {
                info!(event_id = %event.id, payment_intent = object_id, "Payment succeeded");
            }
            EVENT_PAYMENT_FAILED => {
                warn!(event_id = %event.id, payment_intent = object_id, "Payment failed");
            }
            other => {
                info!(event_id = %event.id, event_type = other, "Unhandled event type");
            }
        }
    }
}

#[async_trait]
impl PaymentService for PaymentProcessor {
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn create_checkout(&self, request: CheckoutRequest) -> AppResult<CheckoutSession> {
        request.validate()?;

        let session = self.gateway.create_checkout_session(request).await?;
        info!(session_id = %session.session_id, "Checkout session created");
        Ok(session)
    }

    #[instrument(skip_all, fields(bytes = payload.len()))]
    async fn handle_webhook(&self, payload: &[u8], signature: &str) -> AppResult<()> {
        let event = self.gateway.construct_event(payload, signature)?;
        self.dispatch(&event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{MockPaymentGateway, PaymentError};
    use crate::domain::WebhookEventData;
    use serde_json::json;

    fn request(items: serde_json::Value) -> CheckoutRequest {
        serde_json::from_value(json!({
            "items": items,
            "customer_email": "buyer@example.com"
        }))
        .unwrap()
    }

    fn one_item() -> serde_json::Value {
        json!([{ "product_id": "1", "name": "Lamp", "price": 12.5, "quantity": 1 }])
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_gateway() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_checkout_session().never();

        let err = PaymentProcessor::new(Arc::new(gateway))
            .create_checkout(request(json!([])))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EMPTY_CART");
    }

    #[tokio::test]
    async fn test_checkout_returns_session() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_checkout_session().returning(|_| {
            Ok(CheckoutSession {
                session_id: "cs_test_1".into(),
                session_url: "https://checkout.test/cs_test_1".into(),
            })
        });

        let session = PaymentProcessor::new(Arc::new(gateway))
            .create_checkout(request(one_item()))
            .await
            .unwrap();
        assert_eq!(session.session_id, "cs_test_1");
    }

    #[tokio::test]
    async fn test_gateway_failure_is_checkout_failed() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_checkout_session()
            .returning(|_| Err(PaymentError::Api("card_error: declined".into())));

        let err = PaymentProcessor::new(Arc::new(gateway))
            .create_checkout(request(one_item()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PaymentGateway(_)));
        assert_eq!(err.code(), "CHECKOUT_FAILED");
    }

    #[tokio::test]
    async fn test_webhook_dispatches_verified_event() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_construct_event().times(1).returning(|_, _| {
            Ok(WebhookEvent {
                id: "evt_1".into(),
                event_type: EVENT_PAYMENT_SUCCEEDED.into(),
                data: WebhookEventData {
                    object: json!({ "id": "pi_1" }),
                },
            })
        });

        PaymentProcessor::new(Arc::new(gateway))
            .handle_webhook(b"{}", "t=1,v1=00")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_webhook_bad_signature_is_error() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_construct_event()
            .returning(|_, _| Err(PaymentError::InvalidSignature("no match".into())));

        let err = PaymentProcessor::new(Arc::new(gateway))
            .handle_webhook(b"{}", "t=1,v1=00")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_WEBHOOK");
    }
}

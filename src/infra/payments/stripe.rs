//! Stripe REST client for hosted checkout and webhook events.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use super::params::{checkout_session_params, RedirectUrls};
use super::{verify_signature, PaymentError};
use crate::config::StripeSettings;
use crate::domain::{CheckoutRequest, CheckoutSession, WebhookEvent};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Payment processor seam used by the payment service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session for an already validated request.
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Verify the signature header and decode the event.
    fn construct_event(&self, payload: &[u8], signature: &str)
        -> Result<WebhookEvent, PaymentError>;
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    settings: StripeSettings,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base", &self.settings.api_base)
            .finish_non_exhaustive()
    }
}

impl StripeGateway {
    #[must_use]
    pub fn new(settings: StripeSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn redirect_urls<'a>(&'a self, request: &'a CheckoutRequest) -> RedirectUrls<'a> {
        let pick = |requested: &'a Option<String>, fallback: &'a str| {
            requested
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(fallback)
        };

        RedirectUrls {
            success: pick(&request.success_url, &self.settings.success_url),
            cancel: pick(&request.cancel_url, &self.settings.cancel_url),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(items = request.items.len(), full_info = request.is_full_info()))]
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let form = checkout_session_params(
            &request,
            self.redirect_urls(&request),
            &self.settings.asset_base_url,
        )?;

        let response = self
            .client
            .post(format!(
                "{}/checkout/sessions",
                self.settings.api_base.trim_end_matches('/')
            ))
            .bearer_auth(self.settings.secret_key.expose_secret())
            .form(form.as_pairs())
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| {
                    format!(
                        "{}: {}",
                        body.error.kind.unwrap_or_else(|| "api_error".to_string()),
                        body.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or_else(|| status.to_string());

            error!(%status, error = %detail, "Checkout session creation failed");
            return Err(PaymentError::Api(detail));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;

        debug!(session_id = %session.id, "Checkout session created");

        Ok(CheckoutSession {
            session_id: session.id,
            session_url: session.url.unwrap_or_default(),
        })
    }

    fn construct_event(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        verify_signature(
            payload,
            signature,
            self.settings.webhook_secret.expose_secret(),
            Utc::now().timestamp(),
        )?;

        serde_json::from_slice(payload).map_err(|e| PaymentError::InvalidPayload(e.to_string()))
    }
}

//! Hosted checkout and payment webhook handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::config::STRIPE_SIGNATURE_HEADER;
use crate::domain::{CheckoutRequest, CheckoutSession};
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/checkout", post(create_checkout))
        .route("/webhooks/stripe", post(stripe_webhook))
}

/// Start a hosted checkout session for the submitted items
#[utoipa::path(
    post,
    path = "/api/v1/orders/checkout",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSession),
        (status = 400, description = "Empty cart, missing e-mail or invalid item"),
        (status = 502, description = "Payment provider rejected the session")
    )
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutSession>>> {
    let session = state.services.payments().create_checkout(request).await?;

    Ok(Json(ApiResponse::with_message(
        session,
        "Checkout session created successfully",
    )))
}

/// Payment provider event callback.
///
/// Always answers 200 so the provider does not retry; the outcome is in
/// the envelope.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/stripe",
    tag = "Checkout",
    request_body(content = String, description = "Raw event payload", content_type = "application/json"),
    params(("Stripe-Signature" = String, Header, description = "Signed timestamp and HMAC")),
    responses((status = 200, description = "Webhook acknowledged"))
)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Json<ApiResponse<()>> {
    let payload = match body {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read webhook body");
            return Json(ApiResponse::unsuccessful("Failed to read request body"));
        }
    };

    let Some(signature) = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
    else {
        return Json(ApiResponse::unsuccessful("Missing Stripe signature"));
    };

    match state
        .services
        .payments()
        .handle_webhook(&payload, signature)
        .await
    {
        Ok(()) => Json(ApiResponse::message("Webhook processed successfully")),
        Err(e) => {
            tracing::warn!(error = %e, "Webhook rejected");
            Json(ApiResponse::unsuccessful("Failed to process webhook"))
        }
    }
}

//! Payment-related errors.

use thiserror::Error;

use crate::errors::AppError;

/// Errors that can occur when talking to the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("Payment request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Payment response error: {0}")]
    Response(String),

    /// The processor rejected the call.
    #[error("Payment API error: {0}")]
    Api(String),

    /// Invalid webhook signature.
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    /// Webhook body is not a valid event.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// A price could not be expressed in cents.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidSignature(_) | PaymentError::InvalidPayload(_) => {
                AppError::invalid("INVALID_WEBHOOK", err.to_string())
            }
            PaymentError::InvalidAmount(_) => AppError::invalid("INVALID_ITEM", err.to_string()),
            other => AppError::PaymentGateway(other.to_string()),
        }
    }
}

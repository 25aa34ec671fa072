//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::types::ApiResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    ForbiddenWith(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// Client error carrying a specific machine-readable code
    #[error("{message}")]
    Invalid { code: &'static str, message: String },

    // External service errors
    #[error("Database error")]
    Database(#[source] DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Payment gateway error")]
    PaymentGateway(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden | AppError::ForbiddenWith(_) => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Invalid { code, .. } => *code,
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "INVALID_TOKEN",
            AppError::PaymentGateway(_) => "CHECKOUT_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden | AppError::ForbiddenWith(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Invalid { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::PaymentGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary placed in the envelope's top-level `message`
    fn summary(&self) -> &'static str {
        match self.status() {
            StatusCode::UNAUTHORIZED => "Authentication failed",
            StatusCode::FORBIDDEN => "Access denied",
            StatusCode::NOT_FOUND => "Resource not found",
            StatusCode::CONFLICT => "Resource conflict",
            StatusCode::BAD_REQUEST => "Invalid request",
            StatusCode::BAD_GATEWAY => "Failed to create checkout session",
            _ => "Internal server error",
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Invalid { message, .. } => message.clone(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::PaymentGateway(msg) => {
                tracing::error!("Payment gateway error: {}", msg);
                "The payment provider could not process the request".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        let sql_err = err.sql_err();
        AppError::from_db(err, sql_err)
    }
}

impl AppError {
    /// Unique-key violations are conflicts; other database failures stay internal.
    fn from_db(err: DbErr, sql_err: Option<SqlErr>) -> Self {
        match sql_err {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(%detail, "Unique constraint violated");
                AppError::Conflict("Record".to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::<()>::failure(self.summary(), self.code(), self.user_message());

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn invalid(code: &'static str, msg: impl Into<String>) -> Self {
        AppError::Invalid {
            code,
            message: msg.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::ForbiddenWith(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let (status, body) = body_json(AppError::invalid("INVALID_ID", "Invalid product ID")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid request");
        assert_eq!(body["error"]["code"], "INVALID_ID");
        assert_eq!(body["error"]["message"], "Invalid product ID");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, body) = body_json(AppError::internal("connection string leaked")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_not_found_names_entity() {
        let (status, body) = body_json(AppError::NotFound("Product")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Product not found");
    }

    #[test]
    fn test_gateway_error_maps_to_checkout_failed() {
        let err = AppError::PaymentGateway("card_declined".into());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "CHECKOUT_FAILED");
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = AppError::from_db(
            DbErr::Custom("duplicate key".into()),
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            )),
        );

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        let foreign_key = AppError::from_db(
            DbErr::Custom("fk".into()),
            Some(SqlErr::ForeignKeyConstraintViolation("orders_customer_id_fkey".into())),
        );
        let plain = AppError::from(DbErr::RecordNotFound("orders".into()));

        assert_eq!(foreign_key.code(), "DATABASE_ERROR");
        assert!(matches!(plain, AppError::Database(_)));
        assert_eq!(plain.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        assert!(matches!(
            missing.ok_or_not_found("Order"),
            Err(AppError::NotFound("Order"))
        ));
        assert_eq!(Some(3).ok_or_not_found("Order").unwrap(), 3);
    }
}

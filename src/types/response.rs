use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard API response envelope: `{success, message, data?, error?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Machine-readable error detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// Stable error code, e.g. `INVALID_ID`
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human readable explanation
    #[schema(example = "Product not found")]
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(data, "Success")
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Failure envelope, used by error responses and the webhook acknowledgement.
    pub fn failure(
        message: impl Into<String>,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: detail.into(),
            }),
        }
    }

    /// `success: false` without an error object.
    pub fn unsuccessful(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }
}

/// Created response helper: 201 with the envelope
pub struct Created<T: Serialize>(pub T, pub &'static str);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::CREATED,
            Json(ApiResponse::with_message(self.0, self.1)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_without_error() {
        let json = serde_json::to_value(ApiResponse::with_message(vec![1, 2], "Listed")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Listed");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_message_only_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("Done")).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "Done");
    }

    #[test]
    fn test_unsuccessful_has_no_error_object() {
        let json = serde_json::to_value(ApiResponse::unsuccessful("Missing Stripe signature")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("error").is_none());
    }
}

//! UUID path parameter extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

/// The single `{id}` segment of the route, parsed as a UUID.
///
/// A malformed identifier is a 400 `INVALID_ID` instead of axum's
/// plain-text path rejection.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::invalid("INVALID_ID", "Invalid ID format"))?;

        Uuid::parse_str(&raw)
            .map(IdPath)
            .map_err(|_| AppError::invalid("INVALID_ID", "Invalid ID format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn status_for(uri: &str) -> StatusCode {
        let app = Router::new().route("/items/:id", get(|IdPath(id): IdPath| async move { id.to_string() }));
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_uuid() {
        assert_eq!(status_for(&format!("/items/{}", Uuid::new_v4())).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_bad_request() {
        assert_eq!(status_for("/items/not-a-uuid").await, StatusCode::BAD_REQUEST);
    }
}

//! JWT authentication middleware and role guards.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Pulls the user placed in the request by [`auth_middleware`].
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// The signed-in user when the route allows anonymous callers
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<CurrentUser>().cloned()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.services.auth().verify_token(token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Like [`auth_middleware`], but lets anonymous requests through.
///
/// A missing or unverifiable token leaves the request anonymous.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = bearer_token(request.headers())
        .and_then(|token| match state.services.auth().verify_token(token) {
            Ok(claims) => Some(CurrentUser::from(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid optional token");
                None
            }
        });

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

fn guard(request: &Request, required: UserRole) -> Result<(), AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if user.role == required {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Admin-only routes. Must run after [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    guard(&request, UserRole::Admin)?;
    Ok(next.run(request).await)
}

/// Vendor-only routes. Must run after [`auth_middleware`].
pub async fn require_vendor(request: Request, next: Next) -> Result<Response, AppError> {
    guard(&request, UserRole::Vendor)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_vendor_guard_rejects_customer() {
        let mut request = Request::new(axum::body::Body::empty());
        assert!(matches!(
            guard(&request, UserRole::Vendor),
            Err(AppError::Unauthorized)
        ));

        request.extensions_mut().insert(CurrentUser {
            id: Uuid::new_v4(),
            email: "c@example.com".into(),
            role: UserRole::Customer,
        });
        assert!(matches!(
            guard(&request, UserRole::Vendor),
            Err(AppError::Forbidden)
        ));
    }
}

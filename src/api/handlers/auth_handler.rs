//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserRole;
use crate::errors::AppResult;
use crate::services::{AuthResponse, Registration, TokenResponse};
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "+1 555 0100")]
    pub phone: Option<String>,
    /// `customer` (default) or `vendor`
    pub role: Option<UserRole>,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: request.role.unwrap_or(UserRole::Customer),
        }
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Sign-up and sign-in, open to anyone
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Token refresh, behind the JWT guard
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/auth/refresh", post(refresh))
}

/// Register a new customer or vendor account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role cannot be self-assigned"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let response = state.services.auth().register(payload.into()).await?;

    Ok(Created(response, "User registered successfully"))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account inactive or suspended")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let response = state
        .services
        .auth()
        .login(payload.email.trim().to_lowercase(), payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(response, "Login successful")))
}

/// Exchange a valid token for a fresh one
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state.services.auth().refresh(user.id).await?;

    Ok(Json(ApiResponse::with_message(token, "Token refreshed successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_role_defaults_to_customer() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "password": "password123",
            "first_name": "A",
            "last_name": "B"
        }))
        .unwrap();

        let registration = Registration::from(request);
        assert_eq!(registration.role, UserRole::Customer);
    }

    #[test]
    fn test_register_validation() {
        let request = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            first_name: "".into(),
            last_name: "Doe".into(),
            phone: None,
            role: Some(UserRole::Vendor),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));
    }
}

//! Signed-in user's own profile.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ProfileChanges, UserResponse};
use crate::errors::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub new_password: String,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(get_profile).put(update_profile))
        .route("/users/change-password", put(change_password))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users().get_user(user.id).await?;

    Ok(Json(ApiResponse::with_message(
        user.into(),
        "Profile retrieved successfully",
    )))
}

/// Update names, phone and avatar
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    tag = "Users",
    request_body = ProfileChanges,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(changes): JsonBody<ProfileChanges>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users().update_profile(user.id, changes).await?;

    Ok(Json(ApiResponse::with_message(
        user.into(),
        "Profile updated successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/change-password",
    tag = "Users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is wrong or new one too short"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .users()
        .change_password(user.id, payload.current_password, payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

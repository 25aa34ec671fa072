//! Product review handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{post, put},
    Router,
};

use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Review, ReviewChanges, ReviewInput};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/:id", put(update_review).delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = ReviewInput,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<ReviewInput>,
) -> AppResult<Created<Review>> {
    let review = state.services.reviews().create_review(user.id, input).await?;

    Ok(Created(review, "Review created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    request_body = ReviewChanges,
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
    ValidatedJson(changes): ValidatedJson<ReviewChanges>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = state
        .services
        .reviews()
        .update_review(user.id, id, changes)
        .await?;

    Ok(Json(ApiResponse::with_message(
        review,
        "Review updated successfully",
    )))
}

/// Delete a review; admins may delete any
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .reviews()
        .delete_review(user.id, user.is_admin(), id)
        .await?;

    Ok(Json(ApiResponse::message("Review deleted successfully")))
}

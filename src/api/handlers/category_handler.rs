//! Public category handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::IdPath;
use crate::api::AppState;
use crate::domain::Category;
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:id", get(get_category))
}

/// Active categories ordered by sort order, then name
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Categories",
    responses((status = 200, description = "Active categories", body = [Category]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.services.categories().list_categories().await?;

    Ok(Json(ApiResponse::with_message(
        categories,
        "Categories retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Category not found or inactive")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = state.services.categories().get_category(id).await?;

    Ok(Json(ApiResponse::with_message(
        category,
        "Category retrieved successfully",
    )))
}

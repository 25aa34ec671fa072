//! Customer order history and cancellation.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::{IdPath, QueryParams};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Order;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated, PaginationParams};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/cancel", post(cancel_order))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "The caller's orders, newest first", body = [Order]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Order>>>> {
    let orders = state
        .services
        .orders()
        .customer_orders(user.id, params)
        .await?;

    Ok(Json(ApiResponse::with_message(
        orders,
        "Orders retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.services.orders().customer_order(user.id, id).await?;

    Ok(Json(ApiResponse::with_message(
        order,
        "Order retrieved successfully",
    )))
}

/// Cancel a pending or confirmed order and restock its items
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = Order),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.services.orders().cancel_order(user.id, id).await?;

    Ok(Json(ApiResponse::with_message(
        order,
        "Order cancelled successfully",
    )))
}

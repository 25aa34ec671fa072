//! Vendor self-service: profile, own catalog and incoming orders.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::{IdPath, JsonBody, QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    Order, OrderStatusUpdate, Product, ProductFilter, ProductInput, Vendor, VendorProfile,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockUpdate {
    #[schema(example = 25)]
    pub stock: i32,
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/vendor/profile", get(get_profile).put(save_profile))
        .route("/vendor/products", get(list_products).post(create_product))
        .route(
            "/vendor/products/:id",
            put(update_product).delete(delete_product),
        )
        .route("/vendor/products/:id/stock", patch(update_stock))
        .route("/vendor/orders", get(list_orders))
        .route("/vendor/orders/:id/status", put(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendor/profile",
    tag = "Vendor",
    responses(
        (status = 200, description = "Vendor profile", body = Vendor),
        (status = 404, description = "No vendor profile yet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let vendor = state.services.vendors().get_profile(user.id).await?;

    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor profile retrieved successfully",
    )))
}

/// Create the vendor profile (pending review) or update it
#[utoipa::path(
    put,
    path = "/api/v1/vendor/profile",
    tag = "Vendor",
    request_body = VendorProfile,
    responses(
        (status = 200, description = "Profile saved", body = Vendor),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(profile): ValidatedJson<VendorProfile>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let vendor = state
        .services
        .vendors()
        .save_profile(user.id, profile)
        .await?;

    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor profile saved successfully",
    )))
}

/// The caller's products in any status
#[utoipa::path(
    get,
    path = "/api/v1/vendor/products",
    tag = "Vendor",
    params(ProductFilter),
    responses((status = 200, description = "Paginated products", body = [Product])),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(filter): QueryParams<ProductFilter>,
) -> AppResult<Json<ApiResponse<Paginated<Product>>>> {
    let page = state
        .services
        .products()
        .vendor_products(user.id, filter)
        .await?;

    Ok(Json(ApiResponse::with_message(
        page,
        "Products retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/vendor/products",
    tag = "Vendor",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Vendor not approved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(input): JsonBody<ProductInput>,
) -> AppResult<Created<Product>> {
    let product = state
        .services
        .products()
        .create_product(user.id, input)
        .await?;

    Ok(Created(product, "Product created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/vendor/products/{id}",
    tag = "Vendor",
    request_body = ProductInput,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Product belongs to another vendor"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<ProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .services
        .products()
        .update_product(user.id, id, input)
        .await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Product updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vendor/products/{id}",
    tag = "Vendor",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Product belongs to another vendor"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .products()
        .delete_product(user.id, id)
        .await?;

    Ok(Json(ApiResponse::message("Product deleted successfully")))
}

#[utoipa::path(
    patch,
    path = "/api/v1/vendor/products/{id}/stock",
    tag = "Vendor",
    request_body = StockUpdate,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Stock updated", body = Product),
        (status = 400, description = "Negative stock")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_stock(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<StockUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .services
        .products()
        .update_stock(user.id, id, update.stock)
        .await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Stock updated successfully",
    )))
}

/// Orders containing at least one of the caller's products
#[utoipa::path(
    get,
    path = "/api/v1/vendor/orders",
    tag = "Vendor",
    params(PaginationParams),
    responses((status = 200, description = "Paginated orders", body = [Order])),
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
        .vendor_orders(user.id, params)
        .await?;

    Ok(Json(ApiResponse::with_message(
        orders,
        "Orders retrieved successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/vendor/orders/{id}/status",
    tag = "Vendor",
    request_body = OrderStatusUpdate,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Vendors cannot cancel or refund"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: CurrentUser,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .services
        .orders()
        .vendor_update_status(user.id, id, update.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        order,
        "Order status updated successfully",
    )))
}

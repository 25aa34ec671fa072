//! Administration endpoints: accounts, vendors, catalog, orders and schema.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::{IdPath, JsonBody, QueryParams};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    Category, CategoryInput, Order, OrderStatusFilter, OrderStatusUpdate, Product, ProductFilter,
    ProductStatus, UserResponse, UserStatus, Vendor, VendorStatus,
};
use crate::errors::AppResult;
use crate::infra::MigrationState;
use crate::types::{lenient, ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserStatusUpdate {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorStatusUpdate {
    pub status: VendorStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductStatusUpdate {
    pub status: ProductStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeaturedUpdate {
    pub featured: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VendorStatusFilter {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<VendorStatus>,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", get(get_user).delete(delete_user))
        .route("/admin/users/:id/status", put(set_user_status))
        .route("/admin/vendors", get(list_vendors))
        .route("/admin/vendors/:id", get(get_vendor))
        .route("/admin/vendors/:id/status", put(set_vendor_status))
        .route("/admin/vendors/:id/verify", post(verify_vendor))
        .route("/admin/products", get(list_products))
        .route("/admin/products/:id/featured", put(set_product_featured))
        .route("/admin/products/:id/status", put(set_product_status))
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/admin/orders", get(list_orders))
        .route("/admin/orders/:id/status", put(set_order_status))
        .route("/admin/migrate", post(run_migrations))
        .route("/admin/migrate/status", get(migration_status))
}

// =============================================================================
// Users
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    params(PaginationParams),
    responses((status = 200, description = "Paginated users", body = [UserResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<UserResponse>>>> {
    let users = state.services.users().list_users(params).await?;

    Ok(Json(ApiResponse::with_message(
        users.map(UserResponse::from),
        "Users retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users().get_user(id).await?;

    Ok(Json(ApiResponse::with_message(
        user.into(),
        "User retrieved successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/status",
    tag = "Admin",
    request_body = UserStatusUpdate,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 403, description = "Admins cannot deactivate themselves"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_user_status(
    State(state): State<AppState>,
    admin: CurrentUser,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<UserStatusUpdate>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .services
        .users()
        .set_status(admin.id, id, update.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        user.into(),
        "User status updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Admins cannot delete themselves"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: CurrentUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.users().delete_user(admin.id, id).await?;

    Ok(Json(ApiResponse::message("User deleted successfully")))
}

// =============================================================================
// Vendors
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/admin/vendors",
    tag = "Admin",
    params(VendorStatusFilter, PaginationParams),
    responses((status = 200, description = "Paginated vendors", body = [Vendor])),
    security(("bearer_auth" = []))
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<VendorStatusFilter>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Vendor>>>> {
    let vendors = state
        .services
        .vendors()
        .list_vendors(filter.status, params)
        .await?;

    Ok(Json(ApiResponse::with_message(
        vendors,
        "Vendors retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/vendors/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor found", body = Vendor),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let vendor = state.services.vendors().get_vendor(id).await?;

    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor retrieved successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/vendors/{id}/status",
    tag = "Admin",
    request_body = VendorStatusUpdate,
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Status updated", body = Vendor),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_vendor_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<VendorStatusUpdate>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let vendor = state
        .services
        .vendors()
        .set_status(id, update.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor status updated successfully",
    )))
}

/// Mark the vendor verified and approve it
#[utoipa::path(
    post,
    path = "/api/v1/admin/vendors/{id}/verify",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor verified", body = Vendor),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_vendor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let vendor = state.services.vendors().verify(id).await?;

    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor verified successfully",
    )))
}

// =============================================================================
// Products
// =============================================================================

/// Every product regardless of status, with the public filters
#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    tag = "Admin",
    params(ProductFilter),
    responses((status = 200, description = "Paginated products", body = [Product])),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<ProductFilter>,
) -> AppResult<Json<ApiResponse<Paginated<Product>>>> {
    let page = state.services.products().list_products(filter).await?;

    Ok(Json(ApiResponse::with_message(
        page,
        "Products retrieved successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}/featured",
    tag = "Admin",
    request_body = FeaturedUpdate,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Featured flag updated", body = Product),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_product_featured(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<FeaturedUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .services
        .products()
        .set_featured(id, update.featured)
        .await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Product featured status updated successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}/status",
    tag = "Admin",
    request_body = ProductStatusUpdate,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Status updated", body = Product),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_product_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<ProductStatusUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .services
        .products()
        .set_status(id, update.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Product status updated successfully",
    )))
}

// =============================================================================
// Categories
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/admin/categories",
    tag = "Admin",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid name or slug"),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> AppResult<Created<Category>> {
    let category = state.services.categories().create_category(input).await?;

    Ok(Created(category, "Category created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/categories/{id}",
    tag = "Admin",
    request_body = CategoryInput,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<CategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = state
        .services
        .categories()
        .update_category(id, input)
        .await?;

    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/categories/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.categories().delete_category(id).await?;

    Ok(Json(ApiResponse::message("Category deleted successfully")))
}

// =============================================================================
// Orders
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "Admin",
    params(OrderStatusFilter, PaginationParams),
    responses((status = 200, description = "Paginated orders", body = [Order])),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<OrderStatusFilter>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Order>>>> {
    let orders = state
        .services
        .orders()
        .list_orders(filter.status, params)
        .await?;

    Ok(Json(ApiResponse::with_message(
        orders,
        "Orders retrieved successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/orders/{id}/status",
    tag = "Admin",
    request_body = OrderStatusUpdate,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_order_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(update): JsonBody<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .services
        .orders()
        .update_status(id, update.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        order,
        "Order status updated successfully",
    )))
}

// =============================================================================
// Migrations
// =============================================================================

/// Apply pending schema migrations
#[utoipa::path(
    post,
    path = "/api/v1/admin/migrate",
    tag = "Admin",
    responses((status = 200, description = "Migrations applied", body = [MigrationState])),
    security(("bearer_auth" = []))
)]
pub async fn run_migrations(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MigrationState>>>> {
    state.database.migrate_up().await?;
    tracing::info!("Migrations applied through the admin API");

    let applied = state.database.migration_states().await?;
    Ok(Json(ApiResponse::with_message(
        applied,
        "Migrations completed successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/migrate/status",
    tag = "Admin",
    responses((status = 200, description = "Migration status", body = [MigrationState])),
    security(("bearer_auth" = []))
)]
pub async fn migration_status(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MigrationState>>>> {
    let states = state.database.migration_states().await?;

    Ok(Json(ApiResponse::with_message(
        states,
        "Migration status retrieved successfully",
    )))
}

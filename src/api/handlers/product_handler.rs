//! Public catalog handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::QueryParams;
use crate::api::AppState;
use crate::domain::{Product, ProductFilter, ProductLookup};
use crate::errors::{AppError, AppResult};
use crate::types::{lenient, ApiResponse, Paginated};

/// Full-text search term
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched against name and description
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    /// Number of products (default 10, max 50)
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/products/featured", get(featured_products))
        .route("/products/:id", get(get_product))
}

/// List products with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Paginated products", body = [Product]),
        (status = 400, description = "Invalid filter")
    )
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

/// Search active products
#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    tag = "Products",
    params(SearchQuery, ProductFilter),
    responses(
        (status = 200, description = "Paginated matches", body = [Product]),
        (status = 400, description = "Missing search query")
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    QueryParams(search): QueryParams<SearchQuery>,
    QueryParams(filter): QueryParams<ProductFilter>,
) -> AppResult<Json<ApiResponse<Paginated<Product>>>> {
    let query = search
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::invalid("MISSING_QUERY", "Search query is required"))?;

    let page = state
        .services
        .products()
        .search_products(query, filter)
        .await?;

    Ok(Json(ApiResponse::with_message(
        page,
        "Search completed successfully",
    )))
}

/// Featured, in-stock products, newest first
#[utoipa::path(
    get,
    path = "/api/v1/products/featured",
    tag = "Products",
    params(FeaturedQuery),
    responses((status = 200, description = "Featured products", body = [Product]))
)]
pub async fn featured_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FeaturedQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state
        .services
        .products()
        .featured_products(query.limit)
        .await?;

    Ok(Json(ApiResponse::with_message(
        products,
        "Featured products retrieved successfully",
    )))
}

/// Get one product by UUID or numeric id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product UUID or numeric id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let lookup = ProductLookup::parse(&id)?;
    let product = state.services.products().get_product(lookup).await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Product retrieved successfully",
    )))
}

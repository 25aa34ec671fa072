//! Shopping cart handlers, for signed-in customers and anonymous sessions.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::middleware::MaybeUser;
use crate::api::AppState;
use crate::config::SESSION_ID_HEADER;
use crate::domain::{AddCartItem, Cart, CartOwner, UpdateCartItem};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Whose cart the request addresses: the JWT user, else the `X-Session-ID` header.
pub struct CartOwnerExt(pub CartOwner);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CartOwnerExt {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        if let Some(user) = user {
            return Ok(CartOwnerExt(CartOwner::Customer(user.id)));
        }

        parts
            .headers
            .get(SESSION_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|session| !session.is_empty())
            .map(|session| CartOwnerExt(CartOwner::Session(session.to_string())))
            .ok_or_else(|| {
                AppError::invalid(
                    "MISSING_SESSION",
                    "Authentication or X-Session-ID header is required",
                )
            })
    }
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/clear", post(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:id", put(update_item).delete(remove_item))
}

fn respond(cart: Cart, message: &str) -> Json<ApiResponse<Cart>> {
    Json(ApiResponse::with_message(cart, message))
}

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "Cart",
    params(("X-Session-ID" = Option<String>, Header, description = "Anonymous cart session")),
    responses(
        (status = 200, description = "Current cart", body = Cart),
        (status = 400, description = "No user and no session")
    )
)]
pub async fn get_cart(
    State(state): State<AppState>,
    CartOwnerExt(owner): CartOwnerExt,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.services.carts().get_cart(owner).await?;
    Ok(respond(cart, "Cart retrieved successfully"))
}

/// Add a product, merging with an existing line
#[utoipa::path(
    post,
    path = "/api/v1/cart/items",
    tag = "Cart",
    request_body = AddCartItem,
    params(("X-Session-ID" = Option<String>, Header, description = "Anonymous cart session")),
    responses(
        (status = 200, description = "Item added", body = Cart),
        (status = 400, description = "Unavailable product or insufficient stock"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    CartOwnerExt(owner): CartOwnerExt,
    ValidatedJson(item): ValidatedJson<AddCartItem>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state
        .services
        .carts()
        .add_item(owner, item.product_id, item.quantity)
        .await?;
    Ok(respond(cart, "Item added to cart successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/cart/items/{id}",
    tag = "Cart",
    request_body = UpdateCartItem,
    params(
        ("id" = Uuid, Path, description = "Cart item ID"),
        ("X-Session-ID" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Quantity updated", body = Cart),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    CartOwnerExt(owner): CartOwnerExt,
    IdPath(item_id): IdPath,
    ValidatedJson(update): ValidatedJson<UpdateCartItem>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state
        .services
        .carts()
        .update_item(owner, item_id, update.quantity)
        .await?;
    Ok(respond(cart, "Cart item updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/items/{id}",
    tag = "Cart",
    params(
        ("id" = Uuid, Path, description = "Cart item ID"),
        ("X-Session-ID" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Item removed", body = Cart),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    CartOwnerExt(owner): CartOwnerExt,
    IdPath(item_id): IdPath,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.services.carts().remove_item(owner, item_id).await?;
    Ok(respond(cart, "Item removed from cart successfully"))
}

/// Empty the cart; also served at `POST /cart/clear`
#[utoipa::path(
    delete,
    path = "/api/v1/cart",
    tag = "Cart",
    params(("X-Session-ID" = Option<String>, Header, description = "Anonymous cart session")),
    responses((status = 200, description = "Cart cleared", body = Cart))
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    CartOwnerExt(owner): CartOwnerExt,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.services.carts().clear_cart(owner).await?;
    Ok(respond(cart, "Cart cleared successfully"))
}

//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, auth_routes, cart_routes, category_routes, health, order_routes,
    payment_routes, product_routes, review_routes, token_routes, user_routes, vendor_routes,
};
use super::middleware::{
    auth_middleware, cors_layer, optional_auth_middleware, rate_limit_middleware, require_admin,
    require_vendor, security_headers_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::API_PREFIX;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .merge(product_routes())
        .merge(category_routes())
        .merge(auth_routes())
        .merge(payment_routes());

    // Cart works for anonymous sessions and signed-in customers alike
    let cart = cart_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        optional_auth_middleware,
    ));

    let authenticated = Router::new()
        .merge(token_routes())
        .merge(user_routes())
        .merge(order_routes())
        .merge(review_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let vendor = vendor_routes()
        .route_layer(middleware::from_fn(require_vendor))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin = admin_routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .merge(public)
        .merge(cart)
        .merge(authenticated)
        .merge(vendor)
        .merge(admin);

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Global middleware, outermost last
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&state.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route")
}

//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, cart_handler, category_handler, health_handler, order_handler,
    payment_handler, product_handler, review_handler, user_handler, vendor_handler,
};
use crate::domain::{
    AddCartItem, Address, Cart, CartItem, Category, CategoryInput, CheckoutAddress, CheckoutItem,
    CheckoutRequest, CheckoutSession, CustomerInfo, Dimensions, Order, OrderItem, OrderStatus,
    OrderStatusUpdate, PaymentStatus, Product, ProductInput, ProductStatus, ProfileChanges,
    Review, ReviewChanges, ReviewInput, Seo, UpdateCartItem, UserResponse, UserRole, UserStatus,
    Vendor, VendorProfile, VendorStatus,
};
use crate::infra::MigrationState;
use crate::services::{AuthResponse, TokenResponse};
use crate::types::{ApiError, PaginationMeta};

/// OpenAPI documentation for the SmrtMart API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmrtMart API",
        version = "1.0.0",
        description = "REST backend for the SmrtMart multi-vendor marketplace",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "SmrtMart Engineering", email = "engineering@smrtmart.com")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
        (url = "https://api.smrtmart.com", description = "Production server")
    ),
    paths(
        health_handler::health,
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        // Catalog
        product_handler::list_products,
        product_handler::search_products,
        product_handler::featured_products,
        product_handler::get_product,
        category_handler::list_categories,
        category_handler::get_category,
        // Cart and checkout
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        cart_handler::clear_cart,
        payment_handler::create_checkout,
        payment_handler::stripe_webhook,
        // Customer
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::change_password,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::cancel_order,
        review_handler::create_review,
        review_handler::update_review,
        review_handler::delete_review,
        // Vendor
        vendor_handler::get_profile,
        vendor_handler::save_profile,
        vendor_handler::list_products,
        vendor_handler::create_product,
        vendor_handler::update_product,
        vendor_handler::delete_product,
        vendor_handler::update_stock,
        vendor_handler::list_orders,
        vendor_handler::update_order_status,
        // Admin
        admin_handler::list_users,
        admin_handler::get_user,
        admin_handler::set_user_status,
        admin_handler::delete_user,
        admin_handler::list_vendors,
        admin_handler::get_vendor,
        admin_handler::set_vendor_status,
        admin_handler::verify_vendor,
        admin_handler::list_products,
        admin_handler::set_product_featured,
        admin_handler::set_product_status,
        admin_handler::create_category,
        admin_handler::update_category,
        admin_handler::delete_category,
        admin_handler::list_orders,
        admin_handler::set_order_status,
        admin_handler::run_migrations,
        admin_handler::migration_status,
    ),
    components(
        schemas(
            // Envelope
            ApiError,
            PaginationMeta,
            health_handler::HealthResponse,
            // Accounts
            UserRole,
            UserStatus,
            UserResponse,
            ProfileChanges,
            AuthResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::ChangePasswordRequest,
            // Vendors
            Address,
            Vendor,
            VendorStatus,
            VendorProfile,
            // Catalog
            Product,
            ProductStatus,
            ProductInput,
            Dimensions,
            Seo,
            Category,
            CategoryInput,
            vendor_handler::StockUpdate,
            // Cart, checkout and orders
            Cart,
            CartItem,
            AddCartItem,
            UpdateCartItem,
            CheckoutRequest,
            CheckoutItem,
            CheckoutAddress,
            CustomerInfo,
            CheckoutSession,
            Order,
            OrderItem,
            OrderStatus,
            PaymentStatus,
            OrderStatusUpdate,
            Review,
            ReviewInput,
            ReviewChanges,
            // Admin payloads
            admin_handler::UserStatusUpdate,
            admin_handler::VendorStatusUpdate,
            admin_handler::ProductStatusUpdate,
            admin_handler::FeaturedUpdate,
            MigrationState,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Products", description = "Public product catalog"),
        (name = "Categories", description = "Product categories"),
        (name = "Cart", description = "Shopping cart for customers and anonymous sessions"),
        (name = "Checkout", description = "Hosted checkout and payment webhooks"),
        (name = "Users", description = "Own profile management"),
        (name = "Orders", description = "Customer order history"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Vendor", description = "Vendor profile, catalog and orders"),
        (name = "Admin", description = "Platform administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_versioned_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/v1/products/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/admin/migrate/status"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}

//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All database-backed services use the Unit of Work pattern for
//! centralized repository access and transaction management.

mod auth_service;
mod cart_service;
mod category_service;
pub mod container;
mod order_service;
mod payment_service;
mod product_service;
mod review_service;
mod user_service;
mod vendor_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    AuthResponse, AuthService, Authenticator, Claims, Registration, TokenResponse,
};
pub use cart_service::{CartManager, CartService};
pub use category_service::{CategoryManager, CategoryService};
pub use order_service::{OrderManager, OrderService};
pub use payment_service::{
    PaymentProcessor, PaymentService, EVENT_CHECKOUT_COMPLETED, EVENT_PAYMENT_FAILED,
    EVENT_PAYMENT_SUCCEEDED,
};
pub use product_service::{ProductCatalog, ProductService};
pub use review_service::{ReviewManager, ReviewService};
pub use user_service::{UserManager, UserService};
pub use vendor_service::{VendorManager, VendorService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

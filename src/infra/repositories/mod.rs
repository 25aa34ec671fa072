//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod cart_repository;
mod category_repository;
pub(crate) mod entities;
mod order_repository;
pub mod product_query;
mod product_repository;
mod review_repository;
mod user_repository;
mod vendor_repository;

pub use cart_repository::{CartLine, CartRecord, CartRepository, CartStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};
pub use vendor_repository::{VendorRepository, VendorStore};

pub(crate) use order_repository::{lock_order, update_status as update_order_status};
pub(crate) use product_repository::adjust_stock;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use vendor_repository::MockVendorRepository;

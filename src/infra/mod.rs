//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - The payment processor client
//! - Unit of Work for transaction management

pub mod db;
pub mod payments;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationState, Migrator};
pub use payments::{PaymentError, PaymentGateway, StripeGateway};
pub use repositories::{
    CartLine, CartRecord, CartRepository, CartStore, CategoryRepository, CategoryStore,
    OrderRepository, OrderStore, ProductRepository, ProductStore, ReviewRepository, ReviewStore,
    UserRepository, UserStore, VendorRepository, VendorStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxFuture, TxOrderRepository, TxProductRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use payments::MockPaymentGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCartRepository, MockCategoryRepository, MockOrderRepository, MockProductRepository,
    MockReviewRepository, MockUserRepository, MockVendorRepository,
};

//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through one `Arc<dyn ServiceContainer>`,
//! which lets the API tests swap in fakes without a database.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CartManager, CartService, CategoryManager, CategoryService,
    OrderManager, OrderService, PaymentProcessor, PaymentService, ProductCatalog, ProductService,
    ReviewManager, ReviewService, UserManager, UserService, VendorManager, VendorService,
};
use crate::config::Config;
use crate::infra::{PaymentGateway, Persistence, StripeGateway};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn vendors(&self) -> Arc<dyn VendorService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn carts(&self) -> Arc<dyn CartService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn payments(&self) -> Arc<dyn PaymentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    vendor_service: Arc<dyn VendorService>,
    product_service: Arc<dyn ProductService>,
    category_service: Arc<dyn CategoryService>,
    cart_service: Arc<dyn CartService>,
    order_service: Arc<dyn OrderService>,
    review_service: Arc<dyn ReviewService>,
    payment_service: Arc<dyn PaymentService>,
}

impl Services {
    /// Wire every service over a database connection and a payment gateway
    pub fn new(
        db: sea_orm::DatabaseConnection,
        config: Config,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            vendor_service: Arc::new(VendorManager::new(uow.clone())),
            product_service: Arc::new(ProductCatalog::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow.clone())),
            review_service: Arc::new(ReviewManager::new(uow)),
            payment_service: Arc::new(PaymentProcessor::new(gateway)),
        }
    }

    /// Create service container from database connection and config,
    /// talking to Stripe with the configured credentials
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let gateway = Arc::new(StripeGateway::new(config.stripe.clone()));
        Self::new(db, config, gateway)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn vendors(&self) -> Arc<dyn VendorService> {
        self.vendor_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }
}

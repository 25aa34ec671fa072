//! Shared fixtures for service unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{
    Category, Order, OrderItem, OrderStatus, Password, PaymentStatus, Product, ProductInput,
    ProductStatus, Review, User, UserRole, UserStatus, Vendor, VendorStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CartRepository, CategoryRepository, MockCartRepository, MockCategoryRepository,
    MockOrderRepository, MockProductRepository, MockReviewRepository, MockUserRepository,
    MockVendorRepository, OrderRepository, ProductRepository, ReviewRepository,
    TransactionContext, TxFuture, UnitOfWork, UserRepository, VendorRepository,
};

/// Password behind every fixture user's hash
pub const PASSWORD: &str = "password123";

static PASSWORD_HASH: Lazy<String> = Lazy::new(|| {
    Password::new(PASSWORD)
        .expect("fixture password hashes")
        .into_string()
});

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        (key == "JWT_SECRET").then(|| "unit-test-secret-with-enough-length-0123".to_string())
    })
    .expect("test config loads")
}

/// Unit of work over mocked repositories; transactions are unavailable.
#[derive(Default)]
pub struct StubUnitOfWork {
    users: Arc<MockUserRepository>,
    vendors: Arc<MockVendorRepository>,
    categories: Arc<MockCategoryRepository>,
    products: Arc<MockProductRepository>,
    carts: Arc<MockCartRepository>,
    orders: Arc<MockOrderRepository>,
    reviews: Arc<MockReviewRepository>,
}

impl StubUnitOfWork {
    pub fn with_users(mut self, users: MockUserRepository) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn with_vendors(mut self, vendors: MockVendorRepository) -> Self {
        self.vendors = Arc::new(vendors);
        self
    }

    pub fn with_categories(mut self, categories: MockCategoryRepository) -> Self {
        self.categories = Arc::new(categories);
        self
    }

    pub fn with_products(mut self, products: MockProductRepository) -> Self {
        self.products = Arc::new(products);
        self
    }

    pub fn with_carts(mut self, carts: MockCartRepository) -> Self {
        self.carts = Arc::new(carts);
        self
    }

    pub fn with_orders(mut self, orders: MockOrderRepository) -> Self {
        self.orders = Arc::new(orders);
        self
    }

    pub fn with_reviews(mut self, reviews: MockReviewRepository) -> Self {
        self.reviews = Arc::new(reviews);
        self
    }
}

#[async_trait]
impl UnitOfWork for StubUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn vendors(&self) -> Arc<dyn VendorRepository> {
        self.vendors.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions need a database"))
    }
}

pub fn user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "jane@example.com".into(),
        password_hash: PASSWORD_HASH.clone(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        phone: None,
        role,
        status: UserStatus::Active,
        avatar: None,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn vendor(status: VendorStatus) -> Vendor {
    let now = Utc::now();
    Vendor {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        business_name: "Acme Supplies".into(),
        business_type: None,
        description: None,
        logo: None,
        website: None,
        address: None,
        status,
        verified_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn product(vendor_id: Option<Uuid>) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        numeric_id: 7,
        vendor_id,
        name: "Desk Lamp".into(),
        description: Some("Warm light".into()),
        price: Decimal::new(2499, 2),
        compare_price: None,
        sku: None,
        category: "home".into(),
        tags: vec![],
        images: vec!["lamp.jpg".into()],
        stock: 10,
        status: ProductStatus::Active,
        featured: false,
        weight: None,
        dimensions: None,
        seo: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn product_input() -> ProductInput {
    ProductInput {
        name: "Desk Lamp".into(),
        description: None,
        price: Decimal::new(2499, 2),
        compare_price: None,
        sku: None,
        category: "home".into(),
        tags: vec![],
        images: vec![],
        stock: 5,
        status: None,
        featured: false,
        weight: None,
        dimensions: None,
        seo: None,
    }
}

pub fn category(slug: &str) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::new_v4(),
        name: slug.to_string(),
        slug: slug.to_string(),
        description: None,
        image: None,
        parent_id: None,
        sort_order: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn order(customer_id: Uuid, status: OrderStatus) -> Order {
    let now = Utc::now();
    let id = Uuid::new_v4();
    Order {
        id,
        customer_id,
        order_number: "SM-1001".into(),
        status,
        payment_status: PaymentStatus::Paid,
        payment_method: Some("card".into()),
        stripe_payment_id: None,
        subtotal: Decimal::new(4998, 2),
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        discount: Decimal::ZERO,
        total: Decimal::new(4998, 2),
        currency: "usd".into(),
        shipping_address: None,
        billing_address: None,
        notes: None,
        items: vec![OrderItem {
            id: Uuid::new_v4(),
            order_id: id,
            product_id: Uuid::new_v4(),
            vendor_id: Some(Uuid::new_v4()),
            name: "Desk Lamp".into(),
            price: Decimal::new(2499, 2),
            quantity: 2,
            total: Decimal::new(4998, 2),
            created_at: now,
        }],
        created_at: now,
        updated_at: now,
    }
}

pub fn review(customer_id: Uuid) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        customer_id,
        rating: 4,
        title: None,
        comment: None,
        is_verified: false,
        created_at: now,
        updated_at: now,
    }
}

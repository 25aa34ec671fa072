//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-step workflows, such as
//! cancelling an order and putting its stock back, inside one transaction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use uuid::Uuid;

use super::repositories::{
    adjust_stock, lock_order, update_order_status, CartRepository, CartStore, CategoryRepository,
    CategoryStore, OrderRepository, OrderStore, ProductRepository, ProductStore, ReviewRepository,
    ReviewStore, UserRepository, UserStore, VendorRepository, VendorStore,
};
use crate::domain::{Order, OrderStatus};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method; tests
/// build one from mocked repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn vendors(&self) -> Arc<dyn VendorRepository>;
    fn categories(&self) -> Arc<dyn CategoryRepository>;
    fn products(&self) -> Arc<dyn ProductRepository>;
    fn carts(&self) -> Arc<dyn CartRepository>;
    fn orders(&self) -> Arc<dyn OrderRepository>;
    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// Committed when the closure succeeds, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    vendors: Arc<VendorStore>,
    categories: Arc<CategoryStore>,
    products: Arc<ProductStore>,
    carts: Arc<CartStore>,
    orders: Arc<OrderStore>,
    reviews: Arc<ReviewStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            vendors: Arc::new(VendorStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            carts: Arc::new(CartStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db.clone())),
            reviews: Arc::new(ReviewStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Order operations inside a transaction
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxOrderRepository<'_> {
    /// Load the order and lock its row against concurrent status changes
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Order>> {
        lock_order(self.txn, id).await
    }

    pub async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        update_order_status(self.txn, id, status).await
    }
}

/// Product stock operations inside a transaction
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxProductRepository<'_> {
    /// Put `quantity` units back on the shelf
    pub async fn restock(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
        adjust_stock(self.txn, product_id, quantity).await
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

//! Cart service - Customer and guest shopping carts.
//!
//! Every operation resolves the owner's cart first (creating it on demand)
//! and answers with the full cart view, items hydrated with their products.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{Cart, CartItem, CartOwner, Product, ProductStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CartLine, CartRecord, UnitOfWork};

#[async_trait]
pub trait CartService: Send + Sync {
    async fn get_cart(&self, owner: CartOwner) -> AppResult<Cart>;

    /// Add a product, merging with an existing line for it
    async fn add_item(&self, owner: CartOwner, product_id: Uuid, quantity: i32)
        -> AppResult<Cart>;

    async fn update_item(&self, owner: CartOwner, item_id: Uuid, quantity: i32)
        -> AppResult<Cart>;

    async fn remove_item(&self, owner: CartOwner, item_id: Uuid) -> AppResult<Cart>;

    async fn clear_cart(&self, owner: CartOwner) -> AppResult<Cart>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

/// Reject products that cannot be bought in the requested quantity
fn ensure_available(product: &Product, quantity: i32) -> AppResult<()> {
    if product.status != ProductStatus::Active {
        return Err(AppError::invalid(
            "PRODUCT_UNAVAILABLE",
            format!("{} is not available for purchase", product.name),
        ));
    }
    if quantity > product.stock {
        return Err(AppError::invalid(
            "INSUFFICIENT_STOCK",
            format!("Only {} of {} left in stock", product.stock, product.name),
        ));
    }
    Ok(())
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn product(&self, product_id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn hydrate(&self, line: CartLine) -> AppResult<CartItem> {
        let product = self.uow.products().find_by_id(line.product_id).await?;
        Ok(CartItem {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            product,
            created_at: line.created_at,
        })
    }

    async fn view(&self, owner: &CartOwner, record: CartRecord) -> AppResult<Cart> {
        let lines = self.uow.carts().lines(record.id).await?;
        let items = try_join_all(lines.into_iter().map(|line| self.hydrate(line))).await?;

        Ok(Cart::assemble(
            record.id,
            owner,
            items,
            record.created_at,
            record.updated_at,
        ))
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, owner: CartOwner) -> AppResult<Cart> {
        let record = self.uow.carts().find_or_create(owner.clone()).await?;
        self.view(&owner, record).await
    }

    #[instrument(skip(self, owner))]
    async fn add_item(
        &self,
        owner: CartOwner,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<Cart> {
        let product = self.product(product_id).await?;
        let carts = self.uow.carts();
        let record = carts.find_or_create(owner.clone()).await?;

        let existing = carts
            .find_line_for_product(record.id, product_id)
            .await?
            .map_or(0, |line| line.quantity);
        let merged = existing.saturating_add(quantity);
        ensure_available(&product, merged)?;

        carts.put_line(record.id, product_id, merged).await?;
        debug!(cart_id = %record.id, quantity = merged, "Cart line saved");

        self.view(&owner, record).await
    }

    #[instrument(skip(self, owner))]
    async fn update_item(
        &self,
        owner: CartOwner,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Cart> {
        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let carts = self.uow.carts();
        let record = carts.find_or_create(owner.clone()).await?;
        let line = carts
            .find_line(record.id, item_id)
            .await?
            .ok_or_not_found("Cart item")?;

        let product = self.product(line.product_id).await?;
        ensure_available(&product, quantity)?;

        carts.put_line(record.id, line.product_id, quantity).await?;
        self.view(&owner, record).await
    }

    #[instrument(skip(self, owner))]
    async fn remove_item(&self, owner: CartOwner, item_id: Uuid) -> AppResult<Cart> {
        let record = self.uow.carts().find_or_create(owner.clone()).await?;
        self.uow.carts().remove_line(record.id, item_id).await?;
        self.view(&owner, record).await
    }

    #[instrument(skip(self, owner))]
    async fn clear_cart(&self, owner: CartOwner) -> AppResult<Cart> {
        let record = self.uow.carts().find_or_create(owner.clone()).await?;
        self.uow.carts().clear(record.id).await?;
        self.view(&owner, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockCartRepository, MockProductRepository};
    use crate::services::testing::{product, StubUnitOfWork};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn service(
        carts: MockCartRepository,
        products: MockProductRepository,
    ) -> CartManager<StubUnitOfWork> {
        CartManager::new(Arc::new(
            StubUnitOfWork::default()
                .with_carts(carts)
                .with_products(products),
        ))
    }

    fn record() -> CartRecord {
        CartRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product_id: Uuid, quantity: i32) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }

    fn stocked(stock: i32) -> Product {
        let mut p = product(None);
        p.stock = stock;
        p.price = Decimal::new(1000, 2);
        p
    }

    fn guest() -> CartOwner {
        CartOwner::Session("sess-1".into())
    }

    #[tokio::test]
    async fn test_add_merges_existing_quantity() {
        let item = stocked(5);
        let product_id = item.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(item.clone())));

        let mut carts = MockCartRepository::new();
        carts.expect_find_or_create().returning(|_| Ok(record()));
        carts
            .expect_find_line_for_product()
            .returning(move |_, id| Ok(Some(line(id, 2))));
        carts
            .expect_put_line()
            .withf(|_, _, quantity| *quantity == 5)
            .times(1)
            .returning(|_, id, quantity| Ok(line(id, quantity)));
        carts
            .expect_lines()
            .returning(move |_| Ok(vec![line(product_id, 5)]));

        let cart = service(carts, products)
            .add_item(guest(), product_id, 3)
            .await
            .unwrap();

        assert_eq!(cart.item_count, 5);
        assert_eq!(cart.subtotal, Decimal::new(5000, 2));
        assert_eq!(cart.session_id.as_deref(), Some("sess-1"));
    }

    #[tokio::test]
    async fn test_add_beyond_stock_rejected() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|_| Ok(Some(stocked(4))));

        let mut carts = MockCartRepository::new();
        carts.expect_find_or_create().returning(|_| Ok(record()));
        carts
            .expect_find_line_for_product()
            .returning(|_, id| Ok(Some(line(id, 3))));
        carts.expect_put_line().never();

        let err = service(carts, products)
            .add_item(guest(), Uuid::new_v4(), 2)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    }

    #[tokio::test]
    async fn test_add_inactive_product_rejected() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| {
            let mut draft = stocked(10);
            draft.status = ProductStatus::Draft;
            Ok(Some(draft))
        });

        let mut carts = MockCartRepository::new();
        carts.expect_find_or_create().returning(|_| Ok(record()));
        carts
            .expect_find_line_for_product()
            .returning(|_, _| Ok(None));

        let err = service(carts, products)
            .add_item(CartOwner::Customer(Uuid::new_v4()), Uuid::new_v4(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PRODUCT_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_add_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let err = service(MockCartRepository::new(), products)
            .add_item(guest(), Uuid::new_v4(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
    }

    #[tokio::test]
    async fn test_update_unknown_line() {
        let mut carts = MockCartRepository::new();
        carts.expect_find_or_create().returning(|_| Ok(record()));
        carts.expect_find_line().returning(|_, _| Ok(None));

        let err = service(carts, MockProductRepository::new())
            .update_item(guest(), Uuid::new_v4(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Cart item")));
    }

    #[tokio::test]
    async fn test_removed_product_line_has_zero_total() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let mut carts = MockCartRepository::new();
        carts.expect_find_or_create().returning(|_| Ok(record()));
        carts
            .expect_lines()
            .returning(|_| Ok(vec![line(Uuid::new_v4(), 2)]));

        let cart = service(carts, products).get_cart(guest()).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert!(cart.items[0].product.is_none());
        assert_eq!(cart.subtotal, Decimal::ZERO);
    }
}

//! Order service - Order history and the fulfilment lifecycle.
//!
//! Status changes run inside a transaction; moving an order to
//! `cancelled` puts every line's quantity back in stock.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Order, OrderStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

/// Whose view of the orders table a status change goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Actor {
    Customer(Uuid),
    Vendor(Uuid),
    Admin,
}

impl Actor {
    /// Orders outside the actor's reach are reported as missing
    fn can_see(&self, order: &Order) -> bool {
        match self {
            Actor::Customer(id) => order.belongs_to(*id),
            Actor::Vendor(id) => order.includes_vendor(*id),
            Actor::Admin => true,
        }
    }
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn customer_orders(
        &self,
        customer_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>>;

    async fn customer_order(&self, customer_id: Uuid, id: Uuid) -> AppResult<Order>;

    /// Cancel a pending or confirmed order and restock its items
    async fn cancel_order(&self, customer_id: Uuid, id: Uuid) -> AppResult<Order>;

    /// Orders containing at least one of the caller's products
    async fn vendor_orders(&self, user_id: Uuid, params: PaginationParams)
        -> AppResult<Paginated<Order>>;

    async fn vendor_update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Order>;

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn visible_order(&self, actor: Actor, id: Uuid) -> AppResult<Order> {
        self.uow
            .orders()
            .find_by_id(id)
            .await?
            .filter(|order| actor.can_see(order))
            .ok_or_not_found("Order")
    }

    async fn vendor_id(&self, user_id: Uuid) -> AppResult<Uuid> {
        self.uow
            .vendors()
            .find_by_user(user_id)
            .await?
            .map(|vendor| vendor.id)
            .ok_or_not_found("Vendor")
    }

    async fn change_status(&self, actor: Actor, id: Uuid, next: OrderStatus) -> AppResult<Order> {
        // Checked again inside the transaction
        self.visible_order(actor, id).await?.status.transition(next)?;

        let order = with_transaction!(self.uow, |ctx| {
            let current = ctx
                .orders()
                .find_for_update(id)
                .await?
                .filter(|order| actor.can_see(order))
                .ok_or_not_found("Order")?;
            current.status.transition(next)?;

            let updated = ctx.orders().set_status(id, next).await?;
            if next == OrderStatus::Cancelled {
                for item in &current.items {
                    ctx.products().restock(item.product_id, item.quantity).await?;
                }
            }
            Ok(updated)
        })?;

        info!(order_id = %id, status = %next, "Order status changed");
        Ok(order)
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn customer_orders(
        &self,
        customer_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        let (orders, total) = self
            .uow
            .orders()
            .list_for_customer(customer_id, params)
            .await?;
        Ok(Paginated::from_params(orders, &params, total))
    }

    async fn customer_order(&self, customer_id: Uuid, id: Uuid) -> AppResult<Order> {
        self.visible_order(Actor::Customer(customer_id), id).await
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, customer_id: Uuid, id: Uuid) -> AppResult<Order> {
        self.change_status(Actor::Customer(customer_id), id, OrderStatus::Cancelled)
            .await
    }

    async fn vendor_orders(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        let vendor_id = self.vendor_id(user_id).await?;
        let (orders, total) = self.uow.orders().list_for_vendor(vendor_id, params).await?;
        Ok(Paginated::from_params(orders, &params, total))
    }

    #[instrument(skip(self))]
    async fn vendor_update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Order> {
        if matches!(status, OrderStatus::Cancelled | OrderStatus::Refunded) {
            return Err(AppError::forbidden("Vendors cannot cancel or refund orders"));
        }
        let vendor_id = self.vendor_id(user_id).await?;
        self.change_status(Actor::Vendor(vendor_id), id, status).await
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        let (orders, total) = self.uow.orders().list(status, params).await?;
        Ok(Paginated::from_params(orders, &params, total))
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        self.change_status(Actor::Admin, id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VendorStatus;
    use crate::infra::{MockOrderRepository, MockVendorRepository};
    use crate::services::testing::{order, vendor, StubUnitOfWork};

    fn service(
        orders: MockOrderRepository,
        vendors: MockVendorRepository,
    ) -> OrderManager<StubUnitOfWork> {
        OrderManager::new(Arc::new(
            StubUnitOfWork::default()
                .with_orders(orders)
                .with_vendors(vendors),
        ))
    }

    #[tokio::test]
    async fn test_other_customers_order_is_hidden() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order(Uuid::new_v4(), OrderStatus::Pending))));

        let err = service(orders, MockVendorRepository::new())
            .customer_order(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Order")));
    }

    #[tokio::test]
    async fn test_own_order_is_returned() {
        let customer = Uuid::new_v4();
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(customer, OrderStatus::Pending))));

        let found = service(orders, MockVendorRepository::new())
            .customer_order(customer, Uuid::new_v4())
            .await
            .unwrap();
        assert!(found.belongs_to(customer));
    }

    #[tokio::test]
    async fn test_shipped_order_cannot_be_cancelled() {
        let customer = Uuid::new_v4();
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(customer, OrderStatus::Shipped))));

        let err = service(orders, MockVendorRepository::new())
            .cancel_order(customer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATUS_TRANSITION");
    }

    #[tokio::test]
    async fn test_cancel_runs_in_transaction() {
        let customer = Uuid::new_v4();
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(customer, OrderStatus::Pending))));
        orders.expect_set_status().never();

        // The stub unit of work refuses to open transactions
        let err = service(orders, MockVendorRepository::new())
            .cancel_order(customer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_vendor_without_items_sees_not_found() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_find_by_user()
            .returning(|_| Ok(Some(vendor(VendorStatus::Approved))));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order(Uuid::new_v4(), OrderStatus::Confirmed))));

        let err = service(orders, vendors)
            .vendor_update_status(Uuid::new_v4(), Uuid::new_v4(), OrderStatus::Processing)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Order")));
    }

    #[tokio::test]
    async fn test_vendor_cannot_cancel_or_refund() {
        for status in [OrderStatus::Cancelled, OrderStatus::Refunded] {
            let mut vendors = MockVendorRepository::new();
            vendors.expect_find_by_user().never();
            let mut orders = MockOrderRepository::new();
            orders.expect_find_by_id().never();

            let err = service(orders, vendors)
                .vendor_update_status(Uuid::new_v4(), Uuid::new_v4(), status)
                .await
                .unwrap_err();
            assert_eq!(err.code(), "FORBIDDEN", "{status}");
        }
    }

    #[tokio::test]
    async fn test_admin_listing_filters_by_status() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list()
            .withf(|status, _| *status == Some(OrderStatus::Shipped))
            .returning(|_, _| Ok((vec![], 0)));

        let page = service(orders, MockVendorRepository::new())
            .list_orders(Some(OrderStatus::Shipped), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total_pages, 0);
    }
}

//! Order repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use crate::domain::{Order, OrderItem, OrderStatus, PaymentStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Orders with at least one line sold by the vendor
    async fn list_for_vendor(
        &self,
        vendor_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    async fn list(
        &self,
        status: Option<OrderStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    /// Whether the customer has a paid order containing the product
    async fn has_purchased(&self, customer_id: Uuid, product_id: Uuid) -> AppResult<bool>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        query: Select<OrderEntity>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query = query.order_by_desc(order::Column::CreatedAt);
        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        Ok((with_items(&self.db, models).await?, total))
    }
}

/// Load the lines for every order in one query and attach them.
async fn with_items<C: ConnectionTrait>(db: &C, models: Vec<order::Model>) -> AppResult<Vec<Order>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in OrderItemEntity::find()
        .filter(order_item::Column::OrderId.is_in(ids))
        .order_by_asc(order_item::Column::CreatedAt)
        .all(db)
        .await?
    {
        items
            .entry(item.order_id)
            .or_default()
            .push(OrderItem::from(item));
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let lines = items.remove(&model.id).unwrap_or_default();
            model.into_order(lines)
        })
        .collect())
}

async fn load_order<C: ConnectionTrait>(
    db: &C,
    query: Select<OrderEntity>,
) -> AppResult<Option<Order>> {
    match query.one(db).await? {
        Some(model) => Ok(with_items(db, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

async fn find_order<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Order>> {
    load_order(db, OrderEntity::find_by_id(id)).await
}

/// `SELECT ... FOR UPDATE`; the row stays locked until the transaction ends.
pub(crate) async fn lock_order<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Order>> {
    load_order(db, OrderEntity::find_by_id(id).lock_exclusive()).await
}

pub(crate) async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: OrderStatus,
) -> AppResult<Order> {
    let model = OrderEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_not_found("Order")?;

    let mut active: order::ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    if status == OrderStatus::Cancelled {
        active.payment_status = Set(PaymentStatus::Cancelled.as_str().to_string());
    }
    active.updated_at = Set(Utc::now());
    let model = active.update(db).await?;

    let mut orders = with_items(db, vec![model]).await?;
    orders.pop().ok_or_not_found("Order")
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        find_order(&self.db, id).await
    }

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query = OrderEntity::find().filter(order::Column::CustomerId.eq(customer_id));
        self.page(query, params).await
    }

    async fn list_for_vendor(
        &self,
        vendor_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let vendor_orders = Query::select()
            .column(order_item::Column::OrderId)
            .from(OrderItemEntity)
            .and_where(order_item::Column::VendorId.eq(vendor_id))
            .to_owned();

        let query = OrderEntity::find().filter(order::Column::Id.in_subquery(vendor_orders));
        self.page(query, params).await
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut query = OrderEntity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }
        self.page(query, params).await
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        update_status(&self.db, id, status).await
    }

    async fn has_purchased(&self, customer_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let paid_orders = Query::select()
            .column(order::Column::Id)
            .from(OrderEntity)
            .and_where(order::Column::CustomerId.eq(customer_id))
            .and_where(order::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
            .to_owned();

        let count = OrderItemEntity::find()
            .filter(order_item::Column::ProductId.eq(product_id))
            .filter(order_item::Column::OrderId.in_subquery(paid_orders))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

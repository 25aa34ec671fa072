//! Order database entity. Items are loaded separately.

use sea_orm::entity::prelude::*;

use super::from_json;
use crate::domain::{Order, OrderItem, OrderStatus, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub stripe_payment_id: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub shipping: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
    pub currency: String,
    pub shipping_address: Option<Json>,
    pub billing_address: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            order_number: self.order_number,
            status: self.status.parse().unwrap_or(OrderStatus::Pending),
            payment_status: self.payment_status.parse().unwrap_or(PaymentStatus::Pending),
            payment_method: self.payment_method,
            stripe_payment_id: self.stripe_payment_id,
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            discount: self.discount,
            total: self.total,
            currency: self.currency,
            shipping_address: from_json(self.shipping_address),
            billing_address: from_json(self.billing_address),
            notes: self.notes,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//! Product database entity.

use sea_orm::entity::prelude::*;

use super::from_json;
use crate::domain::{Product, ProductStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Serial column filled by the database
    #[sea_orm(unique)]
    pub numeric_id: i32,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub compare_price: Option<Decimal>,
    pub sku: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub status: String,
    pub featured: bool,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub weight: Option<Decimal>,
    pub dimensions: Option<Json>,
    pub seo: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            numeric_id: model.numeric_id,
            vendor_id: model.vendor_id,
            name: model.name,
            description: model.description,
            price: model.price,
            compare_price: model.compare_price,
            sku: model.sku,
            category: model.category,
            tags: model.tags,
            images: model.images,
            stock: model.stock,
            status: model.status.parse().unwrap_or(ProductStatus::Draft),
            featured: model.featured,
            weight: model.weight,
            dimensions: from_json(model.dimensions),
            seo: from_json(model.seo),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

//! Review database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Review;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Review {
    fn from(model: Model) -> Self {
        Review {
            id: model.id,
            product_id: model.product_id,
            customer_id: model.customer_id,
            rating: model.rating,
            title: model.title,
            comment: model.comment,
            is_verified: model.is_verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

//! Vendor database entity.

use sea_orm::entity::prelude::*;

use super::from_json;
use crate::domain::{Vendor, VendorStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub business_name: String,
    pub business_type: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub address: Option<Json>,
    pub status: String,
    pub verified_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vendor {
    fn from(model: Model) -> Self {
        Vendor {
            id: model.id,
            user_id: model.user_id,
            business_name: model.business_name,
            business_type: model.business_type,
            description: model.description,
            logo: model.logo,
            website: model.website,
            address: from_json(model.address),
            status: model.status.parse().unwrap_or(VendorStatus::Pending),
            verified_at: model.verified_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

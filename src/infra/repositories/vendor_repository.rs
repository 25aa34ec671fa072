//! Vendor repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::to_json;
use super::entities::vendor::{self, ActiveModel, Entity as VendorEntity};
use crate::domain::{Vendor, VendorProfile, VendorStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vendor>>;

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Vendor>>;

    /// Create the user's profile as pending, or update the existing one
    async fn save_profile(&self, user_id: Uuid, profile: VendorProfile) -> AppResult<Vendor>;

    async fn list(
        &self,
        status: Option<VendorStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Vendor>, u64)>;

    async fn set_status(&self, id: Uuid, status: VendorStatus) -> AppResult<Vendor>;

    /// Stamp `verified_at` and approve
    async fn verify(&self, id: Uuid) -> AppResult<Vendor>;
}

pub struct VendorStore {
    db: DatabaseConnection,
}

impl VendorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<vendor::Model> {
        VendorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Vendor")
    }
}

#[async_trait]
impl VendorRepository for VendorStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vendor>> {
        let result = VendorEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Vendor::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Vendor>> {
        let result = VendorEntity::find()
            .filter(vendor::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Vendor::from))
    }

    async fn save_profile(&self, user_id: Uuid, profile: VendorProfile) -> AppResult<Vendor> {
        let now = Utc::now();
        let existing = VendorEntity::find()
            .filter(vendor::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.business_name = Set(profile.business_name);
                active.business_type = Set(profile.business_type);
                active.description = Set(profile.description);
                active.logo = Set(profile.logo);
                active.website = Set(profile.website);
                active.address = Set(to_json(profile.address.as_ref()));
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    business_name: Set(profile.business_name),
                    business_type: Set(profile.business_type),
                    description: Set(profile.description),
                    logo: Set(profile.logo),
                    website: Set(profile.website),
                    address: Set(to_json(profile.address.as_ref())),
                    status: Set(VendorStatus::Pending.as_str().to_string()),
                    verified_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };

        Ok(Vendor::from(model))
    }

    async fn list(
        &self,
        status: Option<VendorStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Vendor>, u64)> {
        let mut query = VendorEntity::find().order_by_desc(vendor::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(vendor::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Vendor::from).collect(), total))
    }

    async fn set_status(&self, id: Uuid, status: VendorStatus) -> AppResult<Vendor> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Vendor::from(model))
    }

    async fn verify(&self, id: Uuid) -> AppResult<Vendor> {
        let now = Utc::now();
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.status = Set(VendorStatus::Approved.as_str().to_string());
        active.verified_at = Set(Some(now));
        active.updated_at = Set(now);

        let model = active.update(&self.db).await?;
        Ok(Vendor::from(model))
    }
}

//! Vendor service - Seller profiles and their review by admins.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Vendor, VendorProfile, VendorStatus};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait VendorService: Send + Sync {
    /// The caller's own vendor profile
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Vendor>;

    /// Create (pending) or update the caller's vendor profile
    async fn save_profile(&self, user_id: Uuid, profile: VendorProfile) -> AppResult<Vendor>;

    async fn list_vendors(
        &self,
        status: Option<VendorStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Vendor>>;

    async fn get_vendor(&self, id: Uuid) -> AppResult<Vendor>;

    async fn set_status(&self, id: Uuid, status: VendorStatus) -> AppResult<Vendor>;

    async fn verify(&self, id: Uuid) -> AppResult<Vendor>;
}

pub struct VendorManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> VendorManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> VendorService for VendorManager<U> {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Vendor> {
        self.uow
            .vendors()
            .find_by_user(user_id)
            .await?
            .ok_or_not_found("Vendor")
    }

    #[instrument(skip(self, profile))]
    async fn save_profile(&self, user_id: Uuid, profile: VendorProfile) -> AppResult<Vendor> {
        let vendor = self.uow.vendors().save_profile(user_id, profile).await?;
        info!(vendor_id = %vendor.id, status = %vendor.status, "Vendor profile saved");
        Ok(vendor)
    }

    async fn list_vendors(
        &self,
        status: Option<VendorStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Vendor>> {
        let (vendors, total) = self.uow.vendors().list(status, params).await?;
        Ok(Paginated::from_params(vendors, &params, total))
    }

    async fn get_vendor(&self, id: Uuid) -> AppResult<Vendor> {
        self.uow
            .vendors()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Vendor")
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Uuid, status: VendorStatus) -> AppResult<Vendor> {
        let vendor = self.uow.vendors().set_status(id, status).await?;
        info!(vendor_id = %id, %status, "Vendor status changed");
        Ok(vendor)
    }

    #[instrument(skip(self))]
    async fn verify(&self, id: Uuid) -> AppResult<Vendor> {
        let vendor = self.uow.vendors().verify(id).await?;
        info!(vendor_id = %id, "Vendor verified");
        Ok(vendor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::MockVendorRepository;
    use crate::services::testing::{vendor, StubUnitOfWork};

    fn service(vendors: MockVendorRepository) -> VendorManager<StubUnitOfWork> {
        VendorManager::new(Arc::new(StubUnitOfWork::default().with_vendors(vendors)))
    }

    #[tokio::test]
    async fn test_new_profile_is_pending() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_save_profile()
            .returning(|_, _| Ok(vendor(VendorStatus::Pending)));

        let profile = VendorProfile {
            business_name: "Acme".into(),
            business_type: None,
            description: None,
            logo: None,
            website: None,
            address: None,
        };
        let saved = service(vendors)
            .save_profile(Uuid::new_v4(), profile)
            .await
            .unwrap();
        assert_eq!(saved.status, VendorStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let mut vendors = MockVendorRepository::new();
        vendors.expect_find_by_user().returning(|_| Ok(None));

        let err = service(vendors)
            .get_profile(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Vendor")));
    }

    #[tokio::test]
    async fn test_list_passes_status_filter() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_list()
            .withf(|status, _| *status == Some(VendorStatus::Pending))
            .returning(|_, _| Ok((vec![vendor(VendorStatus::Pending)], 1)));

        let page = service(vendors)
            .list_vendors(Some(VendorStatus::Pending), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total_pages, 1);
    }
}

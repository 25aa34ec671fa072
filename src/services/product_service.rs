//! Product service - Catalog browsing, vendor product management and
//! admin curation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{
    featured_limit, Product, ProductFilter, ProductInput, ProductLookup, ProductStatus, Vendor,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::Paginated;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Filtered, sorted and paginated listing
    async fn list_products(&self, filter: ProductFilter) -> AppResult<Paginated<Product>>;

    /// Full-text search over active products; a blank query lists instead
    async fn search_products(
        &self,
        query: String,
        filter: ProductFilter,
    ) -> AppResult<Paginated<Product>>;

    async fn featured_products(&self, limit: Option<i64>) -> AppResult<Vec<Product>>;

    async fn get_product(&self, lookup: ProductLookup) -> AppResult<Product>;

    /// Products of the caller's vendor profile, any status
    async fn vendor_products(
        &self,
        user_id: Uuid,
        filter: ProductFilter,
    ) -> AppResult<Paginated<Product>>;

    async fn create_product(&self, user_id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn update_product(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> AppResult<Product>;

    async fn delete_product(&self, user_id: Uuid, id: Uuid) -> AppResult<()>;

    async fn update_stock(&self, user_id: Uuid, id: Uuid, stock: i32) -> AppResult<Product>;

    async fn set_featured(&self, id: Uuid, featured: bool) -> AppResult<Product>;

    async fn set_status(&self, id: Uuid, status: ProductStatus) -> AppResult<Product>;
}

pub struct ProductCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductCatalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn vendor_of(&self, user_id: Uuid) -> AppResult<Vendor> {
        self.uow
            .vendors()
            .find_by_user(user_id)
            .await?
            .ok_or_not_found("Vendor")
    }

    async fn seller(&self, user_id: Uuid) -> AppResult<Vendor> {
        let vendor = self.vendor_of(user_id).await?;
        if !vendor.can_sell() {
            return Err(AppError::forbidden(format!(
                "Vendor account is {}; only approved vendors can manage products",
                vendor.status
            )));
        }
        Ok(vendor)
    }

    /// Load a product and check it belongs to the approved seller
    async fn owned_product(&self, user_id: Uuid, id: Uuid) -> AppResult<(Vendor, Product)> {
        let vendor = self.seller(user_id).await?;
        let product = self
            .uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")?;

        if !product.is_owned_by(vendor.id) {
            return Err(AppError::forbidden("You can only manage your own products"));
        }
        Ok((vendor, product))
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductCatalog<U> {
    async fn list_products(&self, filter: ProductFilter) -> AppResult<Paginated<Product>> {
        filter.validate()?;
        let (page, limit) = (filter.page(), filter.limit());

        let (products, total) = self.uow.products().list(filter).await?;
        Ok(Paginated::new(products, page, limit, total))
    }

    #[instrument(skip(self, filter))]
    async fn search_products(
        &self,
        query: String,
        mut filter: ProductFilter,
    ) -> AppResult<Paginated<Product>> {
        filter.status = Some(ProductStatus::Active);

        let term = query.trim();
        if term.is_empty() {
            return self.list_products(filter).await;
        }

        filter.validate()?;
        let (page, limit) = (filter.page(), filter.limit());
        let (products, total) = self
            .uow
            .products()
            .search(term.to_string(), filter)
            .await?;

        debug!(total, "Product search completed");
        Ok(Paginated::new(products, page, limit, total))
    }

    async fn featured_products(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        self.uow.products().featured(featured_limit(limit)).await
    }

    async fn get_product(&self, lookup: ProductLookup) -> AppResult<Product> {
        self.uow
            .products()
            .find(lookup)
            .await?
            .ok_or_not_found("Product")
    }

    async fn vendor_products(
        &self,
        user_id: Uuid,
        filter: ProductFilter,
    ) -> AppResult<Paginated<Product>> {
        let vendor = self.vendor_of(user_id).await?;
        self.list_products(filter.for_vendor(vendor.id)).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_product(&self, user_id: Uuid, input: ProductInput) -> AppResult<Product> {
        input.validate()?;
        let vendor = self.seller(user_id).await?;

        let product = self.uow.products().create(Some(vendor.id), input).await?;
        info!(product_id = %product.id, vendor_id = %vendor.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn update_product(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> AppResult<Product> {
        input.validate()?;
        self.owned_product(user_id, id).await?;

        self.uow.products().update(id, input).await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        self.owned_product(user_id, id).await?;

        self.uow.products().delete(id).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_stock(&self, user_id: Uuid, id: Uuid, stock: i32) -> AppResult<Product> {
        if stock < 0 {
            return Err(AppError::invalid("INVALID_STOCK", "Stock cannot be negative"));
        }
        self.owned_product(user_id, id).await?;

        self.uow.products().set_stock(id, stock).await
    }

    #[instrument(skip(self))]
    async fn set_featured(&self, id: Uuid, featured: bool) -> AppResult<Product> {
        self.uow.products().set_featured(id, featured).await
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Uuid, status: ProductStatus) -> AppResult<Product> {
        self.uow.products().set_status(id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VendorStatus;
    use crate::infra::{MockProductRepository, MockVendorRepository};
    use crate::services::testing::{product, product_input, vendor, StubUnitOfWork};
    use crate::types::PaginationParams;

    fn service(
        products: MockProductRepository,
        vendors: MockVendorRepository,
    ) -> ProductCatalog<StubUnitOfWork> {
        ProductCatalog::new(Arc::new(
            StubUnitOfWork::default()
                .with_products(products)
                .with_vendors(vendors),
        ))
    }

    fn approved_vendors() -> MockVendorRepository {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_find_by_user()
            .returning(|_| Ok(Some(vendor(VendorStatus::Approved))));
        vendors
    }

    #[tokio::test]
    async fn test_list_uses_filter_pagination() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .returning(|_| Ok((vec![product(None)], 45)));

        let filter = ProductFilter {
            pagination: PaginationParams {
                page: Some(0),
                limit: Some(500),
            },
            ..Default::default()
        };
        let page = service(products, MockVendorRepository::new())
            .list_products(filter)
            .await
            .unwrap();

        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 100);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_search_forces_active_status() {
        let mut products = MockProductRepository::new();
        products
            .expect_search()
            .withf(|term, filter| term == "lamp" && filter.status == Some(ProductStatus::Active))
            .returning(|_, _| Ok((vec![], 0)));

        let filter = ProductFilter {
            status: Some(ProductStatus::Draft),
            ..Default::default()
        };
        service(products, MockVendorRepository::new())
            .search_products("  lamp ".into(), filter)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_blank_search_lists() {
        let mut products = MockProductRepository::new();
        products.expect_search().never();
        products.expect_list().times(1).returning(|_| Ok((vec![], 0)));

        service(products, MockVendorRepository::new())
            .search_products("   ".into(), ProductFilter::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_featured_limit_clamped() {
        let mut products = MockProductRepository::new();
        products
            .expect_featured()
            .withf(|limit| *limit == 50)
            .returning(|_| Ok(vec![]));

        service(products, MockVendorRepository::new())
            .featured_products(Some(999))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_requires_approved_vendor() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_find_by_user()
            .returning(|_| Ok(Some(vendor(VendorStatus::Pending))));
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let err = service(products, vendors)
            .create_product(Uuid::new_v4(), product_input())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenWith(_)));
    }

    #[tokio::test]
    async fn test_create_attaches_vendor() {
        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .withf(|vendor_id, _| vendor_id.is_some())
            .returning(|vendor_id, _| Ok(product(vendor_id)));

        let created = service(products, approved_vendors())
            .create_product(Uuid::new_v4(), product_input())
            .await
            .unwrap();
        assert!(created.vendor_id.is_some());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_lookup() {
        let mut input = product_input();
        input.price = rust_decimal::Decimal::ZERO;

        let err = service(MockProductRepository::new(), MockVendorRepository::new())
            .create_product(Uuid::new_v4(), input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_other_vendors_product_forbidden() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|_| Ok(Some(product(Some(Uuid::new_v4())))));
        products.expect_update().never();

        let err = service(products, approved_vendors())
            .update_product(Uuid::new_v4(), Uuid::new_v4(), product_input())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenWith(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let err = service(products, approved_vendors())
            .delete_product(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let err = service(MockProductRepository::new(), MockVendorRepository::new())
            .update_stock(Uuid::new_v4(), Uuid::new_v4(), -1)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STOCK");
    }
}

//! Product repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use super::entities::to_json;
use super::product_query;
use crate::domain::{Product, ProductFilter, ProductInput, ProductLookup, ProductStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of the filtered listing plus the total match count
    async fn list(&self, filter: ProductFilter) -> AppResult<(Vec<Product>, u64)>;

    async fn search(&self, term: String, filter: ProductFilter)
        -> AppResult<(Vec<Product>, u64)>;

    async fn featured(&self, limit: u64) -> AppResult<Vec<Product>>;

    async fn find(&self, lookup: ProductLookup) -> AppResult<Option<Product>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn create(&self, vendor_id: Option<Uuid>, input: ProductInput) -> AppResult<Product>;

    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn set_stock(&self, id: Uuid, stock: i32) -> AppResult<Product>;

    async fn set_featured(&self, id: Uuid, featured: bool) -> AppResult<Product>;

    async fn set_status(&self, id: Uuid, status: ProductStatus) -> AppResult<Product>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        select: Select<ProductEntity>,
        filter: &ProductFilter,
        search_term: Option<&str>,
    ) -> AppResult<(Vec<Product>, u64)> {
        let total = select.clone().count(&self.db).await?;
        let models = product_query::ordered(select, filter.ordering(), search_term)
            .offset(filter.offset())
            .limit(filter.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn find_model(&self, id: Uuid) -> AppResult<product::Model> {
        ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Product")
    }

    async fn patch<F>(&self, id: Uuid, apply: F) -> AppResult<Product>
    where
        F: FnOnce(&mut ActiveModel) + Send,
    {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        apply(&mut active);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }
}

fn write_fields(active: &mut ActiveModel, input: ProductInput) {
    active.status = Set(input.status_or_default().as_str().to_string());
    active.dimensions = Set(to_json(input.dimensions.as_ref()));
    active.seo = Set(to_json(input.seo.as_ref()));
    active.name = Set(input.name.trim().to_string());
    active.description = Set(input.description);
    active.price = Set(input.price);
    active.compare_price = Set(input.compare_price);
    active.sku = Set(input.sku);
    active.category = Set(input.category.trim().to_string());
    active.tags = Set(input.tags);
    active.images = Set(input.images);
    active.stock = Set(input.stock);
    active.featured = Set(input.featured);
    active.weight = Set(input.weight);
}

/// Add `delta` to a product's stock on any connection or transaction.
pub(crate) async fn adjust_stock<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    delta: i32,
) -> AppResult<()> {
    let result = ProductEntity::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(delta),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(%product_id, "Stock adjustment skipped: product no longer exists");
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self, filter: ProductFilter) -> AppResult<(Vec<Product>, u64)> {
        self.page(product_query::filtered(&filter), &filter, None).await
    }

    async fn search(
        &self,
        term: String,
        filter: ProductFilter,
    ) -> AppResult<(Vec<Product>, u64)> {
        let select = product_query::searched(&filter, &term);
        self.page(select, &filter, Some(&term)).await
    }

    async fn featured(&self, limit: u64) -> AppResult<Vec<Product>> {
        let models = product_query::featured().limit(limit).all(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find(&self, lookup: ProductLookup) -> AppResult<Option<Product>> {
        let select = match lookup {
            ProductLookup::Id(id) => ProductEntity::find_by_id(id),
            ProductLookup::Numeric(n) => {
                ProductEntity::find().filter(product::Column::NumericId.eq(n))
            }
        };

        Ok(select.one(&self.db).await?.map(Product::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn create(&self, vendor_id: Option<Uuid>, input: ProductInput) -> AppResult<Product> {
        let now = Utc::now();
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            numeric_id: NotSet,
            vendor_id: Set(vendor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        write_fields(&mut active, input);

        let model = active.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        self.patch(id, |active| write_fields(active, input)).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Product"));
        }
        Ok(())
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> AppResult<Product> {
        self.patch(id, |active| active.stock = Set(stock)).await
    }

    async fn set_featured(&self, id: Uuid, featured: bool) -> AppResult<Product> {
        self.patch(id, |active| active.featured = Set(featured)).await
    }

    async fn set_status(&self, id: Uuid, status: ProductStatus) -> AppResult<Product> {
        self.patch(id, |active| active.status = Set(status.as_str().to_string()))
            .await
    }
}

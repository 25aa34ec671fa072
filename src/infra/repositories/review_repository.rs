//! Review repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use crate::domain::{Review, ReviewChanges, ReviewInput};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    async fn find_for_customer(
        &self,
        product_id: Uuid,
        customer_id: Uuid,
    ) -> AppResult<Option<Review>>;

    async fn create(
        &self,
        customer_id: Uuid,
        input: ReviewInput,
        is_verified: bool,
    ) -> AppResult<Review>;

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> AppResult<Review>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Review::from))
    }

    async fn find_for_customer(
        &self,
        product_id: Uuid,
        customer_id: Uuid,
    ) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .filter(review::Column::CustomerId.eq(customer_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Review::from))
    }

    async fn create(
        &self,
        customer_id: Uuid,
        input: ReviewInput,
        is_verified: bool,
    ) -> AppResult<Review> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            customer_id: Set(customer_id),
            rating: Set(input.rating),
            title: Set(input.title),
            comment: Set(input.comment),
            is_verified: Set(is_verified),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Review::from(model))
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> AppResult<Review> {
        let existing = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Review")?;

        let mut active: ActiveModel = existing.into();
        active.rating = Set(changes.rating);
        active.title = Set(changes.title);
        active.comment = Set(changes.comment);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Review"));
        }
        Ok(())
    }
}

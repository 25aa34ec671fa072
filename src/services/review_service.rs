//! Review service - Product ratings written by customers.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Review, ReviewChanges, ReviewInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// One review per product and customer; marked verified after a paid order
    async fn create_review(&self, customer_id: Uuid, input: ReviewInput) -> AppResult<Review>;

    async fn update_review(
        &self,
        customer_id: Uuid,
        id: Uuid,
        changes: ReviewChanges,
    ) -> AppResult<Review>;

    /// Authors delete their own reviews; admins delete any
    async fn delete_review(&self, user_id: Uuid, is_admin: bool, id: Uuid) -> AppResult<()>;
}

pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn review(&self, id: Uuid) -> AppResult<Review> {
        self.uow
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Review")
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    async fn create_review(&self, customer_id: Uuid, input: ReviewInput) -> AppResult<Review> {
        self.uow
            .products()
            .find_by_id(input.product_id)
            .await?
            .ok_or_not_found("Product")?;

        if self
            .uow
            .reviews()
            .find_for_customer(input.product_id, customer_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Review for this product"));
        }

        let verified = self
            .uow
            .orders()
            .has_purchased(customer_id, input.product_id)
            .await?;

        let review = self
            .uow
            .reviews()
            .create(customer_id, input, verified)
            .await?;
        info!(review_id = %review.id, verified, "Review created");
        Ok(review)
    }

    #[instrument(skip(self, changes))]
    async fn update_review(
        &self,
        customer_id: Uuid,
        id: Uuid,
        changes: ReviewChanges,
    ) -> AppResult<Review> {
        let review = self.review(id).await?;
        if review.customer_id != customer_id {
            return Err(AppError::forbidden("You can only edit your own reviews"));
        }

        self.uow.reviews().update(id, changes).await
    }

    #[instrument(skip(self))]
    async fn delete_review(&self, user_id: Uuid, is_admin: bool, id: Uuid) -> AppResult<()> {
        let review = self.review(id).await?;
        if review.customer_id != user_id && !is_admin {
            return Err(AppError::forbidden("You can only delete your own reviews"));
        }

        self.uow.reviews().delete(id).await?;
        info!(review_id = %id, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockOrderRepository, MockProductRepository, MockReviewRepository};
    use crate::services::testing::{product, review, StubUnitOfWork};

    fn service(
        reviews: MockReviewRepository,
        products: MockProductRepository,
        orders: MockOrderRepository,
    ) -> ReviewManager<StubUnitOfWork> {
        ReviewManager::new(Arc::new(
            StubUnitOfWork::default()
                .with_reviews(reviews)
                .with_products(products)
                .with_orders(orders),
        ))
    }

    fn input() -> ReviewInput {
        ReviewInput {
            product_id: Uuid::new_v4(),
            rating: 4,
            title: Some("Solid".into()),
            comment: None,
        }
    }

    fn existing_product() -> MockProductRepository {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|_| Ok(Some(product(None))));
        products
    }

    #[tokio::test]
    async fn test_review_of_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let err = service(MockReviewRepository::new(), products, MockOrderRepository::new())
            .create_review(Uuid::new_v4(), input())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
    }

    #[tokio::test]
    async fn test_second_review_conflicts() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_for_customer()
            .returning(|_, customer| Ok(Some(review(customer))));
        reviews.expect_create().never();

        let err = service(reviews, existing_product(), MockOrderRepository::new())
            .create_review(Uuid::new_v4(), input())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_purchase_marks_review_verified() {
        let mut reviews = MockReviewRepository::new();
        reviews.expect_find_for_customer().returning(|_, _| Ok(None));
        reviews
            .expect_create()
            .withf(|_, _, verified| *verified)
            .returning(|customer, _, verified| {
                let mut created = review(customer);
                created.is_verified = verified;
                Ok(created)
            });
        let mut orders = MockOrderRepository::new();
        orders.expect_has_purchased().returning(|_, _| Ok(true));

        let created = service(reviews, existing_product(), orders)
            .create_review(Uuid::new_v4(), input())
            .await
            .unwrap();
        assert!(created.is_verified);
    }

    #[tokio::test]
    async fn test_only_author_updates() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(|_| Ok(Some(review(Uuid::new_v4()))));
        reviews.expect_update().never();

        let changes = ReviewChanges {
            rating: 2,
            title: None,
            comment: None,
        };
        let err = service(reviews, MockProductRepository::new(), MockOrderRepository::new())
            .update_review(Uuid::new_v4(), Uuid::new_v4(), changes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenWith(_)));
    }

    #[tokio::test]
    async fn test_admin_deletes_any_review() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(|_| Ok(Some(review(Uuid::new_v4()))));
        reviews.expect_delete().times(1).returning(|_| Ok(()));

        service(reviews, MockProductRepository::new(), MockOrderRepository::new())
            .delete_review(Uuid::new_v4(), true, Uuid::new_v4())
            .await
            .unwrap();
    }
}

//! Category repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::{Category, CategoryInput};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories by sort order, then name
    async fn list_active(&self) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    async fn create(&self, input: CategoryInput, slug: String) -> AppResult<Category>;

    async fn update(&self, id: Uuid, input: CategoryInput, slug: String) -> AppResult<Category>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list_active(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;

        Ok(result.map(Category::from))
    }

    async fn create(&self, input: CategoryInput, slug: String) -> AppResult<Category> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            slug: Set(slug),
            description: Set(input.description),
            image: Set(input.image),
            parent_id: Set(input.parent_id),
            sort_order: Set(input.sort_order),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, input: CategoryInput, slug: String) -> AppResult<Category> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Category")?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.slug = Set(slug);
        active.description = Set(input.description);
        active.image = Set(input.image);
        active.parent_id = Set(input.parent_id);
        active.sort_order = Set(input.sort_order);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Category"));
        }
        Ok(())
    }
}

//! Category service - Public category tree and admin maintenance.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Category, CategoryInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Active category by id; inactive ones are reported missing
    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    async fn create_category(&self, input: CategoryInput) -> AppResult<Category>;

    async fn update_category(&self, id: Uuid, input: CategoryInput) -> AppResult<Category>;

    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Slug must be free unless it already belongs to `current`
    async fn ensure_slug_available(&self, slug: &str, current: Option<Uuid>) -> AppResult<()> {
        match self.uow.categories().find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != current => {
                Err(AppError::conflict(format!("Category with slug '{}'", slug)))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_parent_exists(&self, parent_id: Option<Uuid>) -> AppResult<()> {
        if let Some(parent_id) = parent_id {
            self.uow
                .categories()
                .find_by_id(parent_id)
                .await?
                .ok_or_not_found("Parent category")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list_active().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .filter(|category| category.is_active)
            .ok_or_not_found("Category")
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let slug = input.resolve_slug()?;
        self.ensure_slug_available(&slug, None).await?;
        self.ensure_parent_exists(input.parent_id).await?;

        let category = self.uow.categories().create(input, slug).await?;
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, input))]
    async fn update_category(&self, id: Uuid, input: CategoryInput) -> AppResult<Category> {
        if input.parent_id == Some(id) {
            return Err(AppError::validation("A category cannot be its own parent"));
        }

        let slug = input.resolve_slug()?;
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")?;
        self.ensure_slug_available(&slug, Some(id)).await?;
        self.ensure_parent_exists(input.parent_id).await?;

        self.uow.categories().update(id, input, slug).await
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.uow.categories().delete(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

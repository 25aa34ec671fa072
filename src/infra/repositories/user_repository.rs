//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, ProfileChanges, User, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup is case-insensitive; e-mails are stored lowercased
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User>;

    async fn record_login(&self, id: Uuid) -> AppResult<()>;

    /// Newest first
    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email.trim().to_lowercase()),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            phone: Set(new_user.phone),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            avatar: Set(None),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(avatar) = changes.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn record_login(&self, id: Uuid) -> AppResult<()> {
        let now = Utc::now();
        UserEntity::update_many()
            .col_expr(user::Column::LastLoginAt, sea_orm::sea_query::Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let query = UserEntity::find().order_by_desc(user::Column::CreatedAt);

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User"));
        }

        Ok(())
    }
}

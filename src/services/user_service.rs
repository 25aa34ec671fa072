//! User service - Profile self-service and account administration.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Password, ProfileChanges, User, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update the caller's own names, phone and avatar
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    /// Replace the password after checking the current one
    async fn change_password(
        &self,
        id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>>;

    /// Admin status change; admins cannot lock themselves out
    async fn set_status(&self, actor: Uuid, id: Uuid, status: UserStatus) -> AppResult<User>;

    /// Admin delete; admins cannot delete themselves
    async fn delete_user(&self, actor: Uuid, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn require_name(value: &Option<String>, field: &str) -> AppResult<()> {
    match value {
        Some(name) if name.trim().is_empty() => {
            Err(AppError::validation(format!("{} cannot be empty", field)))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        require_name(&changes.first_name, "First name")?;
        require_name(&changes.last_name, "Last name")?;

        if changes.is_empty() {
            return self.get_user(id).await;
        }

        self.uow.users().update_profile(id, changes).await
    }

    #[instrument(skip(self, current_password, new_password))]
    async fn change_password(
        &self,
        id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !Password::from_hash(user.password_hash).verify(&current_password) {
            return Err(AppError::invalid(
                "INVALID_PASSWORD",
                "Current password is incorrect",
            ));
        }

        let hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(id, hash).await?;

        info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        let (users, total) = self.uow.users().list(params).await?;
        Ok(Paginated::from_params(users, &params, total))
    }

    #[instrument(skip(self))]
    async fn set_status(&self, actor: Uuid, id: Uuid, status: UserStatus) -> AppResult<User> {
        if actor == id && status != UserStatus::Active {
            return Err(AppError::forbidden("You cannot deactivate your own account"));
        }

        let user = self.uow.users().set_status(id, status).await?;
        info!(user_id = %id, %status, "User status changed");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, actor: Uuid, id: Uuid) -> AppResult<()> {
        if actor == id {
            return Err(AppError::forbidden("You cannot delete your own account"));
        }

        self.uow.users().delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;
    use crate::services::testing::{user, StubUnitOfWork};

    fn service(users: MockUserRepository) -> UserManager<StubUnitOfWork> {
        UserManager::new(Arc::new(StubUnitOfWork::default().with_users(users)))
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = service(users).get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let changes = ProfileChanges {
            first_name: Some("  ".into()),
            ..Default::default()
        };

        let err = service(MockUserRepository::new())
            .update_profile(Uuid::new_v4(), changes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_change_password_checks_current() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(UserRole::Customer))));
        users.expect_update_password().never();

        let err = service(users)
            .change_password(Uuid::new_v4(), "wrong-one".into(), "brand-new-pass".into())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PASSWORD");
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(UserRole::Customer))));
        users
            .expect_update_password()
            .withf(|_, hash| Password::from_hash(hash.clone()).verify("brand-new-pass"))
            .times(1)
            .returning(|_, _| Ok(()));

        service(users)
            .change_password(Uuid::new_v4(), "password123".into(), "brand-new-pass".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_cannot_suspend_or_delete_self() {
        let me = Uuid::new_v4();
        let service = service(MockUserRepository::new());

        assert!(matches!(
            service.set_status(me, me, UserStatus::Suspended).await,
            Err(AppError::ForbiddenWith(_))
        ));
        assert!(matches!(
            service.delete_user(me, me).await,
            Err(AppError::ForbiddenWith(_))
        ));
    }

    #[tokio::test]
    async fn test_list_users_paginates() {
        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .returning(|_| Ok((vec![user(UserRole::Customer)], 41)));

        let page = service(users)
            .list_users(PaginationParams::new(2, 20))
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 41);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.page, 2);
    }
}

//! Account lifecycle tests.
//!
//! Runs the real authentication and user services against an in-memory
//! user store, so token issuing, password hashing and account status
//! checks are exercised together.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use smrtmart_api::config::Config;
use smrtmart_api::domain::{NewUser, ProfileChanges, User, UserRole, UserStatus};
use smrtmart_api::errors::{AppError, AppResult};
use smrtmart_api::infra::{
    CartRepository, CategoryRepository, MockCartRepository, MockCategoryRepository,
    MockOrderRepository, MockProductRepository, MockReviewRepository, MockVendorRepository,
    OrderRepository, ProductRepository, ReviewRepository, TransactionContext, TxFuture,
    UnitOfWork, UserRepository, VendorRepository,
};
use smrtmart_api::services::{
    AuthService, Authenticator, Registration, UserManager, UserService,
};
use smrtmart_api::types::PaginationParams;

/// Users kept in memory, newest last
#[derive(Default)]
struct MemoryUsers {
    users: Mutex<Vec<User>>,
}

impl MemoryUsers {
    fn modify<F>(&self, id: Uuid, f: F) -> AppResult<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound("User"))?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            role: new.role,
            status: UserStatus::Active,
            avatar: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        self.modify(id, |user| {
            if let Some(first_name) = changes.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = changes.last_name {
                user.last_name = last_name;
            }
            if changes.phone.is_some() {
                user.phone = changes.phone;
            }
            if changes.avatar.is_some() {
                user.avatar = changes.avatar;
            }
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        self.modify(id, |user| user.password_hash = password_hash)
            .map(|_| ())
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        self.modify(id, |user| user.status = status)
    }

    async fn record_login(&self, id: Uuid) -> AppResult<()> {
        self.modify(id, |user| user.last_login_at = Some(Utc::now()))
            .map(|_| ())
    }

    async fn list(&self, _params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let mut users = self.users.lock().unwrap().clone();
        users.reverse();
        let total = users.len() as u64;
        Ok((users, total))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }
}

/// Only the user store is real; every other repository panics if touched
struct AccountsOnly {
    users: Arc<MemoryUsers>,
}

#[async_trait]
impl UnitOfWork for AccountsOnly {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn vendors(&self) -> Arc<dyn VendorRepository> {
        Arc::new(MockVendorRepository::new())
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        Arc::new(MockCategoryRepository::new())
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        Arc::new(MockProductRepository::new())
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        Arc::new(MockCartRepository::new())
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        Arc::new(MockOrderRepository::new())
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        Arc::new(MockReviewRepository::new())
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("account flows never open transactions"))
    }
}

struct Accounts {
    auth: Authenticator<AccountsOnly>,
    users: UserManager<AccountsOnly>,
}

fn accounts() -> Accounts {
    let config = Config::from_lookup(|key| {
        (key == "JWT_SECRET").then(|| "account-flow-secret-long-enough-0123456789".to_string())
    })
    .unwrap();
    let uow = Arc::new(AccountsOnly {
        users: Arc::new(MemoryUsers::default()),
    });

    Accounts {
        auth: Authenticator::new(uow.clone(), config),
        users: UserManager::new(uow),
    }
}

fn registration(email: &str, role: UserRole) -> Registration {
    Registration {
        email: email.to_string(),
        password: "correct-horse".to_string(),
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        phone: None,
        role,
    }
}

#[tokio::test]
async fn test_register_login_refresh() {
    let accounts = accounts();

    let registered = accounts
        .auth
        .register(registration("  Dana@Example.COM ", UserRole::Vendor))
        .await
        .unwrap();
    assert_eq!(registered.user.email, "dana@example.com");
    assert_eq!(registered.user.role, UserRole::Vendor);

    let session = accounts
        .auth
        .login("dana@example.com".into(), "correct-horse".into())
        .await
        .unwrap();
    let claims = accounts
        .auth
        .verify_token(&session.token.access_token)
        .unwrap();
    assert_eq!(claims.sub, registered.user.id);
    assert_eq!(claims.role, UserRole::Vendor);

    let refreshed = accounts.auth.refresh(claims.sub).await.unwrap();
    assert_eq!(refreshed.token_type, "Bearer");
    assert!(accounts.auth.verify_token(&refreshed.access_token).is_ok());

    let profile = accounts.users.get_user(claims.sub).await.unwrap();
    assert!(profile.last_login_at.is_some());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let accounts = accounts();
    accounts
        .auth
        .register(registration("dup@example.com", UserRole::Customer))
        .await
        .unwrap();

    let err = accounts
        .auth
        .register(registration("DUP@example.com", UserRole::Customer))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_wrong_password_is_generic() {
    let accounts = accounts();
    accounts
        .auth
        .register(registration("a@example.com", UserRole::Customer))
        .await
        .unwrap();

    let wrong = accounts
        .auth
        .login("a@example.com".into(), "not-it".into())
        .await
        .unwrap_err();
    let unknown = accounts
        .auth
        .login("nobody@example.com".into(), "correct-horse".into())
        .await
        .unwrap_err();

    assert!(matches!(wrong, AppError::InvalidCredentials));
    assert!(matches!(unknown, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_suspended_account_is_locked_out() {
    let accounts = accounts();
    let admin = Uuid::new_v4();
    let user = accounts
        .auth
        .register(registration("b@example.com", UserRole::Customer))
        .await
        .unwrap()
        .user;

    accounts
        .users
        .set_status(admin, user.id, UserStatus::Suspended)
        .await
        .unwrap();

    let login = accounts
        .auth
        .login("b@example.com".into(), "correct-horse".into())
        .await
        .unwrap_err();
    let refresh = accounts.auth.refresh(user.id).await.unwrap_err();

    assert_eq!(login.code(), "FORBIDDEN");
    assert_eq!(refresh.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_change_password() {
    let accounts = accounts();
    let user = accounts
        .auth
        .register(registration("c@example.com", UserRole::Customer))
        .await
        .unwrap()
        .user;

    let err = accounts
        .users
        .change_password(user.id, "guess".into(), "brand-new-pass".into())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_PASSWORD");

    accounts
        .users
        .change_password(user.id, "correct-horse".into(), "brand-new-pass".into())
        .await
        .unwrap();

    assert!(accounts
        .auth
        .login("c@example.com".into(), "correct-horse".into())
        .await
        .is_err());
    assert!(accounts
        .auth
        .login("c@example.com".into(), "brand-new-pass".into())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_admin_cannot_remove_self() {
    let accounts = accounts();
    let admin = accounts
        .auth
        .register(registration("d@example.com", UserRole::Customer))
        .await
        .unwrap()
        .user;

    let suspend = accounts
        .users
        .set_status(admin.id, admin.id, UserStatus::Suspended)
        .await
        .unwrap_err();
    let delete = accounts.users.delete_user(admin.id, admin.id).await.unwrap_err();

    assert_eq!(suspend.code(), "FORBIDDEN");
    assert_eq!(delete.code(), "FORBIDDEN");
    assert!(accounts.users.get_user(admin.id).await.is_ok());
}

#[tokio::test]
async fn test_profile_update_keeps_unset_fields() {
    let accounts = accounts();
    let user = accounts
        .auth
        .register(registration("e@example.com", UserRole::Customer))
        .await
        .unwrap()
        .user;

    let updated = accounts
        .users
        .update_profile(
            user.id,
            ProfileChanges {
                phone: Some("+1 555 0100".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Dana");
    assert_eq!(updated.phone.as_deref(), Some("+1 555 0100"));

    let err = accounts
        .users
        .update_profile(
            user.id,
            ProfileChanges {
                last_name: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

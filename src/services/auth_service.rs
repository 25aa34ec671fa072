//! Authentication service - Registration, login and token handling.
//!
//! Passwords are hashed through the domain `Password` value object and
//! accounts are loaded through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserResponse, UserRole, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Issued token together with the account it belongs to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

/// Sign-up data, already shape-validated by the handler
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer or vendor account and sign it in
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Reissue a token for the holder of a still-valid one
    async fn refresh(&self, user_id: Uuid) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn ensure_can_sign_in(user: &User) -> AppResult<()> {
    match user.status {
        UserStatus::Active => Ok(()),
        UserStatus::Suspended => Err(AppError::forbidden("Account is suspended")),
        UserStatus::Inactive => Err(AppError::forbidden("Account is inactive")),
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn respond(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    #[instrument(skip(self, registration), fields(role = %registration.role))]
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        if !registration.role.is_self_assignable() {
            return Err(AppError::forbidden("Admin accounts cannot be self-registered"));
        }

        let email = registration.email.trim().to_lowercase();
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                first_name: registration.first_name.trim().to_string(),
                last_name: registration.last_name.trim().to_string(),
                phone: registration.phone,
                role: registration.role,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        self.respond(user)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let Some(user) = self.uow.users().find_by_email(&email).await? else {
            // Keep response timing independent of whether the account exists
            Password::verify_dummy(&password);
            return Err(AppError::InvalidCredentials);
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        ensure_can_sign_in(&user)?;
        self.uow.users().record_login(user.id).await?;

        self.respond(user)
    }

    #[instrument(skip(self))]
    async fn refresh(&self, user_id: Uuid) -> AppResult<TokenResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        ensure_can_sign_in(&user)?;
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }
}

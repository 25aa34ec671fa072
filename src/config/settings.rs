//! Application settings loaded from environment variables.

use std::env;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::constants::{
    DEFAULT_ASSET_BASE_URL, DEFAULT_CHECKOUT_CANCEL_URL, DEFAULT_CHECKOUT_SUCCESS_URL,
    DEFAULT_CORS_ORIGIN, DEFAULT_DATABASE_URL, DEFAULT_DB_MAX_CONNECTIONS,
    DEFAULT_DB_MIN_CONNECTIONS, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_STRIPE_API_BASE, MIN_JWT_SECRET_LENGTH,
};

/// Development-only signing key, refused in release builds
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Payment gateway settings
#[derive(Clone)]
pub struct StripeSettings {
    pub secret_key: SecretString,
    pub webhook_secret: SecretString,
    pub api_base: String,
    pub success_url: String,
    pub cancel_url: String,
    pub asset_base_url: String,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub stripe: StripeSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_origins", &self.cors_origins)
            .field("stripe_api_base", &self.stripe.api_base)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} characters long", MIN_JWT_SECRET_LENGTH),
            });
        }

        let database_url = var("DATABASE_URL")
            .or_else(|| database_url_from_parts(&var))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let db_min_connections = parse_or(&var, "DB_MIN_CONNECTIONS", DEFAULT_DB_MIN_CONNECTIONS)?;
        if db_min_connections > db_max_connections {
            return Err(ConfigError::Invalid {
                name: "DB_MIN_CONNECTIONS",
                reason: "cannot exceed DB_MAX_CONNECTIONS".to_string(),
            });
        }

        // PORT wins over SERVER_PORT so hosted platforms can inject it
        let server_port = match var("PORT") {
            Some(_) => parse_or(&var, "PORT", DEFAULT_SERVER_PORT)?,
            None => parse_or(&var, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
        };

        let stripe_secret = var("STRIPE_SECRET_KEY").unwrap_or_default();
        let webhook_secret = var("STRIPE_WEBHOOK_SECRET").unwrap_or_default();
        if stripe_secret.is_empty() {
            tracing::warn!("STRIPE_SECRET_KEY not set, checkout sessions will be rejected");
        }
        if webhook_secret.is_empty() {
            tracing::warn!("STRIPE_WEBHOOK_SECRET not set, every webhook will be rejected");
        }

        Ok(Self {
            database_url,
            db_max_connections,
            db_min_connections,
            jwt_secret: SecretString::from(jwt_secret),
            jwt_expiration_hours: parse_or(
                &var,
                "JWT_EXPIRATION_HOURS",
                DEFAULT_JWT_EXPIRATION_HOURS,
            )?,
            server_host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            cors_origins: parse_origins(
                &var("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            ),
            stripe: StripeSettings {
                secret_key: SecretString::from(stripe_secret),
                webhook_secret: SecretString::from(webhook_secret),
                api_base: var("STRIPE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
                success_url: var("CHECKOUT_SUCCESS_URL")
                    .unwrap_or_else(|| DEFAULT_CHECKOUT_SUCCESS_URL.to_string()),
                cancel_url: var("CHECKOUT_CANCEL_URL")
                    .unwrap_or_else(|| DEFAULT_CHECKOUT_CANCEL_URL.to_string()),
                asset_base_url: var("ASSET_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ASSET_BASE_URL.to_string()),
            },
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Compose a Postgres URL from the discrete DB_* variables, if DB_HOST is set.
fn database_url_from_parts<F>(var: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = var("DB_HOST")?;
    let port = var("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let user = var("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = var("DB_PASSWORD").unwrap_or_default();
    let name = var("DB_NAME").unwrap_or_else(|| "smrtmart".to_string());
    let sslmode = var("DB_SSLMODE").unwrap_or_else(|| "disable".to_string());

    Some(format!(
        "postgres://{user}:{password}@{host}:{port}/{name}?sslmode={sslmode}"
    ))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "a-test-secret-that-is-long-enough-123";

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.db_min_connections, 5);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.stripe.api_base, DEFAULT_STRIPE_API_BASE);
    }

    #[test]
    fn test_port_overrides_server_port() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("PORT", "9000"),
            ("SERVER_PORT", "7000"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let result = Config::from_lookup(lookup(&[("JWT_SECRET", "short")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "JWT_SECRET", .. })));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("DB_MAX_CONNECTIONS", "many"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("DB_HOST", "db.internal"),
            ("DB_USER", "shop"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "catalog"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_url,
            "postgres://shop:pw@db.internal:5432/catalog?sslmode=disable"
        );
    }

    #[test]
    fn test_cors_origins_split_and_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("CORS_ORIGINS", "https://a.com, *.vercel.app ,,"),
        ]))
        .unwrap();

        assert_eq!(config.cors_origins, vec!["https://a.com", "*.vercel.app"]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }
}

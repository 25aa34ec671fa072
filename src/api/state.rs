//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use super::middleware::RateLimiter;
use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Service container
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle, used by health checks and migration endpoints
    pub database: Arc<Database>,
    /// Per-client request throttle
    pub rate_limiter: Arc<RateLimiter>,
    /// Allowed CORS origins
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Create application state from a database handle and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let cors_origins = Arc::new(config.cors_origins.clone());
        let services = Arc::new(Services::from_connection(database.get_connection(), config));

        Self::new(services, database, cors_origins)
    }

    /// Create new application state with manually injected services.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Arc<Database>,
        cors_origins: Arc<Vec<String>>,
    ) -> Self {
        Self {
            services,
            database,
            rate_limiter: Arc::new(RateLimiter::new()),
            cors_origins,
        }
    }

    /// Replace the rate limiter, e.g. with a tighter quota in tests
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = Arc::new(rate_limiter);
        self
    }
}

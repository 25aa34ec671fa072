//! SmrtMart API - REST backend for the SmrtMart multi-vendor marketplace.
//!
//! Customers browse a catalog, keep a cart (anonymous or signed in) and pay
//! through a hosted checkout; vendors manage their own products and orders;
//! admins moderate accounts, vendors and the catalog.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, repositories and the payment processor
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, response envelope)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve --port 8080
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};

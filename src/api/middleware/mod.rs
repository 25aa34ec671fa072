//! API middleware.

mod auth;
mod cors;
mod rate_limit;
mod security_headers;

pub use auth::{
    auth_middleware, optional_auth_middleware, require_admin, require_vendor, CurrentUser,
    MaybeUser,
};
pub use cors::{cors_layer, origin_allowed};
pub use rate_limit::{rate_limit_middleware, spawn_cleanup, RateLimitError, RateLimiter};
pub use security_headers::security_headers_middleware;

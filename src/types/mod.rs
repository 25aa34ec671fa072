//! Shared types: response envelope, pagination and query parsing.

mod pagination;
mod query;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use query::{lenient, lenient_bool};
pub use response::{ApiError, ApiResponse, Created};

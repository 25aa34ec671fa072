//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::lenient;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters shared by every list endpoint.
///
/// Missing, blank, unparseable or non-positive values fall back to page 1
/// and 20 items; `limit` is capped at [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-indexed page number
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    /// Items per page (max 100)
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: i64::try_from(page).ok(),
            limit: i64::try_from(limit).ok(),
        }
    }

    /// Effective page number
    pub fn page(&self) -> u64 {
        match self.page {
            Some(page) if page > 0 => page as u64,
            _ => DEFAULT_PAGE_NUMBER,
        }
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => (limit as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Rows to skip, kept within the range of a Postgres `bigint`
    pub fn offset(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }
}

/// Paginated response payload: `{data, pagination}`
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit > 0 { total.div_ceil(limit) } else { 0 };

        Self {
            data,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                total_pages,
            },
        }
    }

    /// Create from the params that produced the page
    pub fn from_params(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        Self::new(data, params.page(), params.limit(), total)
    }

    /// Convert the items while keeping the metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_page_one_limit_twenty() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(-5),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_limit_capped() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 2 * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let params = PaginationParams {
            page: Some(i64::MAX),
            limit: Some(100),
        };
        assert_eq!(params.page(), i64::MAX as u64);
        assert_eq!(params.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Paginated<u8> = Paginated::new(vec![], 1, 20, 41);
        assert_eq!(page.pagination.total_pages, 3);

        let empty: Paginated<u8> = Paginated::new(vec![], 1, 20, 0);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn test_serializes_pagination_key() {
        let page = Paginated::new(vec!["a"], 2, 10, 11);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["limit"], 10);
        assert_eq!(json["pagination"]["total_pages"], 2);
    }
}

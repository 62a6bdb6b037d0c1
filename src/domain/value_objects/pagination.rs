use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Page window of a list query. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Build a page window, clamping `limit` to `max_limit`.
    pub fn new(page: i64, limit: i64, max_limit: i64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPagination(format!(
                "page must be at least 1, got {}",
                page
            )));
        }

        if limit < 1 {
            return Err(DomainError::InvalidPagination(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }

        if max_limit < 1 {
            return Err(DomainError::InvalidPagination(format!(
                "max limit must be at least 1, got {}",
                max_limit
            )));
        }

        Ok(Self {
            page,
            limit: limit.min(max_limit),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_page() {
        let p = Pagination::new(1, 2, 100).unwrap();
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(3, 25, 100).unwrap();
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_limit_is_clamped() {
        let p = Pagination::new(1, 5000, 1000).unwrap();
        assert_eq!(p.limit(), 1000);
    }

    #[test]
    fn test_rejects_page_zero() {
        assert!(Pagination::new(0, 10, 100).is_err());
        assert!(Pagination::new(1, 0, 100).is_err());
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let p = Pagination::new(i64::MAX, 1000, 1000).unwrap();
        assert_eq!(p.offset(), i64::MAX);
    }
}

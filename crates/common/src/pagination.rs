//! Page/limit arithmetic shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not supply one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Raw pagination parameters as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Items per page.
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Page number clamped to `>= 1`.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.map_or(1, |p| p.max(1) as u64)
    }

    /// Limit clamped to `[1, MAX_LIMIT]`.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
            .map_or(DEFAULT_LIMIT, |l| l.max(1).min(MAX_LIMIT as i64) as u64)
    }

    /// Row offset for the clamped page, saturating at the largest offset
    /// the store accepts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }

    /// Build the response metadata for a result set of `total` rows.
    #[must_use]
    pub fn paginate(&self, total: u64) -> Pagination {
        Pagination::new(self.page(), self.limit(), total)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Compute `total_pages = ceil(total / limit)`.
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = if limit == 0 { 1 } else { limit };
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

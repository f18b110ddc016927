//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Query parameters for listing endpoints
///
/// Extracted from URL query strings. Every filter defaults to empty, which
/// means "not active".
///
/// # Example
/// ```text
/// GET /api/posts?page=2&limit=10
/// GET /api/posts?search=rust&category=技术&sort=title
/// GET /api/users?role=author&sort=followersCount
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of items per page
    pub limit: Option<usize>,

    /// Free-text search query
    pub search: String,

    /// Category selector (posts)
    pub category: String,

    /// Tag selector (posts)
    pub tag: String,

    /// Role selector (users)
    pub role: String,

    /// Sort-key identifier, e.g. `publishedAt` or `title`
    pub sort: Option<String>,
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, falling back to `default` and never exceeding `max`
    pub fn limit(&self, default: usize, max: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, max.max(1))
    }
}

/// Paginated response structure
///
/// The consumer-facing shape every listing read returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// The windowed items
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters, before windowing)
    pub total: usize,

    /// Total number of pages
    pub pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    ///
    /// The flags are advisory: an out-of-range `page` is reported as is,
    /// with `has_next == false`.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    /// Index range of the window in the filtered view
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.limit);
        let end = start.saturating_add(self.limit).min(self.total);
        start.min(end)..end
    }
}

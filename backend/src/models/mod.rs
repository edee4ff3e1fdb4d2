//! Data models shared across database access and API handlers.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Normalized paging window derived from optional `page` / `per_page` params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Clamps `page` to at least 1 and `per_page` to `1..=MAX_PER_PAGE`.
    /// Returns `None` when the offset would overflow.
    pub fn from_params(page: Option<i64>, per_page: Option<i64>) -> Option<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let offset = page.checked_sub(1)?.checked_mul(per_page)?;
        Some(Self {
            page,
            per_page,
            offset,
        })
    }

    /// Slices an already filtered collection.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let per_page = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(per_page).collect()
    }
}

/// Wrapper for paginated API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    /// The data items for the current page.
    pub data: Vec<T>,
    /// Total number of records matching the query.
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            data,
            total,
            page: window.page,
            per_page: window.per_page,
        }
    }
}

pub mod batch;
pub mod dashboard;
pub mod department;
pub mod evaluation;
pub mod property;
pub mod user;

//! Page request and paged result types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page number used when only a size is given
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when only a page number is given
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page request: `page >= 1`, `1 <= size <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validate a page request
    pub fn new(page: i64, size: i64) -> Result<Self> {
        if page < 1 {
            return Err(Error::invalid_argument(
                "page",
                "Page number must be greater than 0",
            ));
        }
        if size < 1 {
            return Err(Error::invalid_argument("size", "Page size must be at least 1"));
        }
        if size > i64::from(MAX_PAGE_SIZE) {
            return Err(Error::invalid_argument(
                "size",
                format!("Page size must not exceed {MAX_PAGE_SIZE}"),
            ));
        }

        // Beyond u32::MAX every page is past the end anyway
        let page = u32::try_from(page).unwrap_or(u32::MAX);
        Ok(Self {
            page,
            size: size as u32,
        })
    }

    /// Validate optional parameters, filling in defaults
    pub fn from_optional(page: Option<i64>, size: Option<i64>) -> Result<Self> {
        Self::new(
            page.unwrap_or(i64::from(DEFAULT_PAGE)),
            size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE)),
        )
    }

    /// Requested page number (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a larger list, with derived navigation flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_first: bool,
    pub is_last: bool,
}

/// Slice `items` into the requested page
///
/// Pages past the end yield empty content with accurate totals.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> PagedResult<T> {
    let page = request.page();
    let size = request.size() as usize;

    let total_elements = items.len();
    let total_pages = total_elements.div_ceil(size);

    let start = (page as usize - 1).saturating_mul(size);
    let content = if start < total_elements {
        let end = start.saturating_add(size).min(total_elements);
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    PagedResult {
        content,
        page,
        size: request.size(),
        total_elements: total_elements as u64,
        total_pages: total_pages as u64,
        has_next: (page as usize) < total_pages,
        has_previous: page > 1,
        is_first: page == 1,
        is_last: page as usize >= total_pages,
    }
}

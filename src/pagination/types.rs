//! Pagination cursor types

use serde::{Deserialize, Serialize};

/// Pagination metadata recovered from one upstream page response
///
/// Every field is optional: header presence is not guaranteed, and an absent
/// value means "unknown" rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Page number of this response
    pub current_page: Option<u32>,
    /// Number of items on this page
    pub page_items: Option<u32>,
    /// Total number of pages
    pub total_pages: Option<u32>,
    /// Total number of items across all pages
    pub total_count: Option<u64>,
    /// `rel="first"` link target
    pub first_url: Option<String>,
    /// `rel="prev"` link target
    pub prev_url: Option<String>,
    /// `rel="next"` link target
    pub next_url: Option<String>,
    /// `rel="last"` link target
    pub last_url: Option<String>,
}

impl PageCursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor positioned at `current` of `total` pages
    pub fn at(current: u32, total: u32) -> Self {
        Self {
            current_page: Some(current),
            total_pages: Some(total),
            ..Default::default()
        }
    }

    /// True iff both the current and total page are known and current < total
    pub fn has_next(&self) -> bool {
        match (self.current_page, self.total_pages) {
            (Some(current), Some(total)) => current < total,
            _ => false,
        }
    }

    /// True when no pagination header contributed to this cursor
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

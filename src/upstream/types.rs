//! Upstream page types and the fetch trait

use crate::error::Result;
use crate::pagination::PageCursor;
use crate::types::UpstreamContact;
use async_trait::async_trait;

/// A single upstream fetch result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedPage {
    /// Contacts in upstream order; `None` marks a null array entry
    pub contacts: Vec<Option<UpstreamContact>>,
    /// Cursor recovered from the response headers, if any were present
    pub cursor: Option<PageCursor>,
}

impl AggregatedPage {
    /// Create a page from contacts and an optional cursor
    pub fn new(contacts: Vec<UpstreamContact>, cursor: Option<PageCursor>) -> Self {
        Self {
            contacts: contacts.into_iter().map(Some).collect(),
            cursor,
        }
    }

    /// True when another page follows this one
    pub fn has_next(&self) -> bool {
        self.cursor.as_ref().is_some_and(PageCursor::has_next)
    }
}

/// Source of upstream contact pages
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Fetch one page (1-based)
    ///
    /// Fails with `UpstreamUnavailable` once the retry budget is spent.
    async fn fetch_page(&self, page: u32) -> Result<AggregatedPage>;
}

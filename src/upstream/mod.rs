//! Upstream contacts API
//!
//! One call to [`ContactsApi::fetch_page`] retrieves one upstream page and its
//! pagination cursor. [`UpstreamClient`] is the HTTP implementation; tests
//! and alternative sources implement the trait directly.

mod client;
mod types;

pub use client::{UpstreamClient, CONTACTS_ENDPOINT, PAGE_PARAM};
pub use types::{AggregatedPage, ContactsApi};

//! Pagination module
//!
//! Turns the pagination headers of one upstream response into a [`PageCursor`].
//!
//! # Overview
//!
//! The upstream contacts API reports its position through plain integer
//! headers (`Current-Page`, `Page-Items`, `Total-Pages`, `Total-Count`) and an
//! RFC 5988 `Link` header. Parsing is pure and never fails: a missing or
//! non-numeric header leaves the corresponding field unknown.

mod parser;
mod types;

pub use parser::{parse_headers, parse_link_header, LinkRelations};
pub use types::PageCursor;

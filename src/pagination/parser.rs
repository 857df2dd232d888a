//! Header parsing for the upstream pagination cursor

use super::types::PageCursor;
use regex::Regex;
use reqwest::header::HeaderMap;
use std::str::FromStr;
use std::sync::LazyLock;

/// Header carrying the current page number
pub const CURRENT_PAGE: &str = "Current-Page";
/// Header carrying the number of items on the page
pub const PAGE_ITEMS: &str = "Page-Items";
/// Header carrying the total page count
pub const TOTAL_PAGES: &str = "Total-Pages";
/// Header carrying the total item count
pub const TOTAL_COUNT: &str = "Total-Count";
/// RFC 5988 link-relation header
pub const LINK: &str = "Link";

/// Regex for one link entry: `<url>; rel="name"`
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="([^"]+)""#).unwrap());

/// URLs recovered from a `Link` header, keyed by relation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRelations {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

/// Parse a `Link` header value
///
/// Format: `<https://api.example.com/contacts?page=2>; rel="next", <...>; rel="last"`.
/// Unrecognized relations are ignored; a repeated relation keeps its last URL.
pub fn parse_link_header(header: &str) -> LinkRelations {
    let mut links = LinkRelations::default();

    for captures in LINK_REGEX.captures_iter(header) {
        let url = captures[1].to_string();
        match &captures[2] {
            "first" => links.first = Some(url),
            "prev" => links.prev = Some(url),
            "next" => links.next = Some(url),
            "last" => links.last = Some(url),
            _ => {}
        }
    }

    links
}

/// Build a cursor from response headers
///
/// Returns `None` when the response carried none of the pagination headers,
/// so callers can tell "no cursor" apart from "cursor with unknown fields".
pub fn parse_headers(headers: &HeaderMap) -> Option<PageCursor> {
    let present = [CURRENT_PAGE, PAGE_ITEMS, TOTAL_PAGES, TOTAL_COUNT, LINK]
        .iter()
        .any(|name| headers.contains_key(*name));
    if !present {
        return None;
    }

    let links = header_str(headers, LINK)
        .map(parse_link_header)
        .unwrap_or_default();

    Some(PageCursor {
        current_page: header_number(headers, CURRENT_PAGE),
        page_items: header_number(headers, PAGE_ITEMS),
        total_pages: header_number(headers, TOTAL_PAGES),
        total_count: header_number(headers, TOTAL_COUNT),
        first_url: links.first,
        prev_url: links.prev,
        next_url: links.next,
        last_url: links.last,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Parse an integer header; absent or non-numeric values stay unknown
fn header_number<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    header_str(headers, name).and_then(|s| s.trim().parse().ok())
}

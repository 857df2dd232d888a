// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Contact Aggregator
//!
//! Walks a paginated upstream contacts API, concatenates every page into one
//! ordered aggregate, caches it behind a single-flight read-through cache,
//! and serves it flat or re-paginated to the caller's page size.
//!
//! ## Features
//!
//! - **Bounded Retry**: Each upstream page gets 3 attempts with capped exponential backoff
//! - **Header Cursors**: `Current-Page`, `Total-Pages`, `Total-Count` and `Link` parsing
//! - **Single-Flight Cache**: Concurrent misses share one aggregation; failures are never stored
//! - **Re-Pagination**: Caller-sized pages with navigation flags over the cached aggregate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contact_aggregator::{cli::build_service, config::Settings, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::load(None)?;
//!     settings.validate()?;
//!
//!     let service = build_service(&settings)?;
//!     let contacts = service.list(None).await?;
//!     println!("{} contacts", contacts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       HTTP / CLI surface                        │
//! │  GET /contacts    GET /health    DELETE /contacts/cache         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Service  │ Cache     │ Aggregator    │ Upstream  │ HTTP        │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Filter   │ TTL       │ Page loop     │ Decode    │ Timeouts    │
//! │ Paginate │ Coalesce  │ Source tag    │ Cursor    │ Retry       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the aggregator
pub mod error;

/// Contact record types
pub mod types;

/// HTTP client with timeouts and retry
pub mod http;

/// Pagination header parsing
pub mod pagination;

/// Upstream contacts API client
pub mod upstream;

/// Page aggregation and the aggregate cache
pub mod aggregate;

/// Filtering and re-pagination over the aggregate
pub mod service;

/// Settings loading
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use service::{ContactService, PageRequest, PagedResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! CLI module
//!
//! Command-line interface for the contact aggregator.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode
//! - `fetch` - Aggregate once and print the result
//! - `check` - Probe the upstream API

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::{build_service, Runner};
pub use server::{build_router, serve, ApiError, AppState, APPLICATION_NAME};

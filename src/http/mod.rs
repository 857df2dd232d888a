//! HTTP client module
//!
//! Provides an HTTP client with per-call timeouts and bounded retry.
//!
//! # Features
//!
//! - **Timeouts**: Connect, read and write bounds on every call
//! - **Bearer Auth**: Static credential sent as a default header
//! - **Retry**: Exponential backoff, capped per delay, bounded by attempt count

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy};

#[cfg(test)]
mod tests;

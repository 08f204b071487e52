//! Retry-aware HTTP transport.
//!
//! This module builds HTTP clients with optional cookie stores and proxies
//! (direct HTTP proxy or SOCKS4/5 tunnel) and performs GET/POST requests
//! with bounded retry on transient failures.

mod client;
mod retry;
mod types;

pub use client::{build_client, HttpTransport};
pub use retry::read_with_retry;
pub use types::*;

//! Resilient HTTP loader for translation tables.
//!
//! This crate provides:
//! - `TranslationFetcher` - Language, namespace and health operations with retry
//! - `RetryPolicy` - Exponential backoff schedule
//! - `FetchError` - Classified transport and HTTP failures
//! - `HttpTransport` / `Connector` - Transport seam, with a reqwest implementation

mod client;
mod error;
mod payload;
mod reqwest_transport;
mod retry;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use client::*;
pub use error::*;
pub use reqwest_transport::*;
pub use retry::*;
pub use transport::*;

//! Core abstractions for the translation-data client.
//!
//! This crate provides the fundamental types and traits:
//! - `ClientConfig` / `Credential` / `RetrySettings` - Client configuration
//! - `TranslationMap` / `TranslationKey` - Translation tables and their identity
//! - `I18nClientError` / `ConfigError` - Errors shared across crates
//! - `TranslationLoader` / `TranslationCatalog` - Capability traits

mod config;
mod error;
mod loader;
mod translation;

pub use config::*;
pub use error::*;
pub use loader::*;
pub use translation::*;

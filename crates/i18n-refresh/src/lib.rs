//! Refresh coordination for translation tables.
//!
//! This crate provides:
//! - `RefreshCoordinator` - Mutually exclusive refresh into a `TranslationCatalog`
//! - `RefreshSchedule` / `run_schedule` - Calendar-driven refresh loop
//! - `RefreshError` / `RefreshReport` - Refresh results

mod coordinator;
mod error;
mod schedule;

pub use coordinator::*;
pub use error::*;
pub use schedule::*;

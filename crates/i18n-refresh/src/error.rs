//! Refresh errors and results.

use std::fmt;

use i18n_core::TranslationKey;

/// Why a refresh did not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The health probe failed; nothing was fetched.
    #[error("Translation API is unhealthy")]
    Unhealthy,
}

/// Tables touched by one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Keys whose tables were applied to the catalog, in fetch order.
    pub loaded: Vec<TranslationKey>,
    /// Keys that failed to load and were skipped.
    pub failed: Vec<TranslationKey>,
}

impl RefreshReport {
    /// Whether every attempted table loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} loaded, {} failed", self.loaded.len(), self.failed.len())
    }
}

/// Result of a refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was already running; this call did nothing.
    Skipped,
    /// The refresh ran.
    Completed(RefreshReport),
}

impl RefreshOutcome {
    /// The report, if the refresh ran.
    pub fn report(&self) -> Option<&RefreshReport> {
        match self {
            Self::Skipped => None,
            Self::Completed(report) => Some(report),
        }
    }
}

//! Translation tables and their identity.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::InvalidCode;

/// Key → value table for one `(language, namespace)` pair.
///
/// Values are strings or nested objects.
pub type TranslationMap = serde_json::Map<String, Value>;

/// Language code → translation table.
pub type TranslationSet = BTreeMap<String, TranslationMap>;

/// Identity of a translation table: a language and an optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslationKey {
    /// Language code (e.g., "tr").
    pub language: String,
    /// API-defined namespace (e.g., "validation").
    pub namespace: Option<String>,
}

impl TranslationKey {
    /// Key for a language's base translations.
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            namespace: None,
        }
    }

    /// Key for a namespace within a language.
    pub fn namespaced(language: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Build from borrowed parts.
    pub fn from_parts(language: &str, namespace: Option<&str>) -> Self {
        Self {
            language: language.to_string(),
            namespace: namespace.map(String::from),
        }
    }

    /// Check that both codes are safe path segments.
    pub fn validate(&self) -> Result<(), InvalidCode> {
        let codes = std::iter::once(self.language.as_str()).chain(self.namespace.as_deref());
        for code in codes {
            if !is_valid_code(code) {
                return Err(InvalidCode(code.to_string()));
            }
        }
        Ok(())
    }

    /// API path serving this table.
    pub fn path(&self) -> Result<String, InvalidCode> {
        self.validate()?;
        Ok(match &self.namespace {
            Some(ns) => format!("/translations/{}/{}", self.language, ns),
            None => format!("/translations/{}", self.language),
        })
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", self.language, ns),
            None => write!(f, "{}", self.language),
        }
    }
}

/// Whether `code` can be used as a single path or file-name segment.
///
/// Codes are non-empty and contain no separators, dots or control characters.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && !code
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '.') || c.is_control())
}

/// Resolve a dotted key (`"errors.required"`) against a table.
///
/// A literal key containing dots takes precedence over nested traversal.
pub fn resolve_key<'a>(map: &'a TranslationMap, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }

    let mut parts = key.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

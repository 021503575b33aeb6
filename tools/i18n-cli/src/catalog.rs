//! JSON-file translation catalog.
//!
//! Each table lives in `<dir>/<language>.json` or
//! `<dir>/<language>.<namespace>.json`. Lookups are served from memory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use i18n_core::{resolve_key, CatalogError, TranslationCatalog, TranslationKey, TranslationMap};
use parking_lot::RwLock;
use serde_json::Value;

/// Catalog persisted as one JSON file per table.
pub struct FileCatalog {
    dir: PathBuf,
    tables: RwLock<HashMap<TranslationKey, TranslationMap>>,
}

impl FileCatalog {
    /// Open `dir`, loading any tables already stored there.
    ///
    /// A missing directory is an empty catalog; it is created on first write.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let mut tables = HashMap::new();

        if dir.is_dir() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().map_or(true, |e| e != "json") {
                    continue;
                }
                let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(parse_key) else {
                    continue;
                };
                match read_table(&path) {
                    Ok(table) => {
                        tables.insert(key, table);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable translation file");
                    }
                }
            }
        }

        Ok(Self {
            dir,
            tables: RwLock::new(tables),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn file_path(&self, key: &TranslationKey) -> PathBuf {
        match &key.namespace {
            Some(ns) => self.dir.join(format!("{}.{}.json", key.language, ns)),
            None => self.dir.join(format!("{}.json", key.language)),
        }
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<TranslationKey> {
        let mut keys: Vec<_> = self.tables.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn persist(&self, key: &TranslationKey, translations: &TranslationMap) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_path(key);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(translations)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)
    }
}

impl TranslationCatalog for FileCatalog {
    /// Write the table to disk, then serve it from memory.
    fn apply(&self, key: &TranslationKey, translations: TranslationMap) -> Result<(), CatalogError> {
        key.validate()?;
        self.persist(key, &translations).map_err(|e| {
            CatalogError::Backend(format!("{}: {}", self.file_path(key).display(), e))
        })?;
        self.tables.write().insert(key.clone(), translations);
        Ok(())
    }

    /// Resolve against the base table first, then `<namespace>.<rest>`
    /// against the namespace table.
    fn translate(&self, key: &str, language: &str) -> Result<String, CatalogError> {
        let tables = self.tables.read();

        let value = tables
            .get(&TranslationKey::language(language))
            .and_then(|table| resolve_key(table, key))
            .or_else(|| {
                let (namespace, rest) = key.split_once('.')?;
                let table = tables.get(&TranslationKey::namespaced(language, namespace))?;
                resolve_key(table, rest)
            });

        match value {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(CatalogError::NotAString {
                key: key.to_string(),
            }),
            None if !tables.keys().any(|k| k.language == language) => {
                Err(CatalogError::UnknownLanguage(language.to_string()))
            }
            None => Err(CatalogError::MissingKey {
                key: key.to_string(),
                language: language.to_string(),
            }),
        }
    }
}

fn parse_key(stem: &str) -> Option<TranslationKey> {
    let key = match stem.split_once('.') {
        Some((language, namespace)) => TranslationKey::namespaced(language, namespace),
        None => TranslationKey::language(stem),
    };
    key.validate().ok().map(|_| key)
}

fn read_table(path: &Path) -> io::Result<TranslationMap> {
    let content = fs::read(path)?;
    serde_json::from_slice(&content).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn table(value: Value) -> TranslationMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_writes_files_and_reopens() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let catalog = FileCatalog::open(dir).unwrap();
        assert!(catalog.keys().is_empty());

        catalog
            .apply(&TranslationKey::language("en"), table(json!({ "hello": "Hello" })))
            .unwrap();
        catalog.apply(
            &TranslationKey::namespaced("en", "validation"),
            table(json!({ "required": "Required" })),
        )
        .unwrap();

        assert!(dir.join("en.json").exists());
        assert!(dir.join("en.validation.json").exists());

        let reopened = FileCatalog::open(dir).unwrap();
        assert_eq!(
            reopened.keys(),
            vec![
                TranslationKey::language("en"),
                TranslationKey::namespaced("en", "validation"),
            ]
        );
        assert_eq!(reopened.translate("hello", "en").unwrap(), "Hello");
    }

    #[test]
    fn test_apply_replaces_previous_table() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let catalog = FileCatalog::open(dir).unwrap();
        let key = TranslationKey::language("tr");

        catalog.apply(&key, table(json!({ "a": "1", "b": "2" }))).unwrap();
        catalog.apply(&key, table(json!({ "a": "3" }))).unwrap();

        assert_eq!(catalog.translate("a", "tr").unwrap(), "3");
        assert!(matches!(
            catalog.translate("b", "tr"),
            Err(CatalogError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_translate_lookup_rules() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let catalog = FileCatalog::open(dir).unwrap();
        catalog.apply(
            &TranslationKey::language("en"),
            table(json!({ "errors": { "required": "Base required" }, "menu": { "file": "File" } })),
        )
        .unwrap();
        catalog.apply(
            &TranslationKey::namespaced("en", "validation"),
            table(json!({ "email": { "invalid": "Invalid email" } })),
        )
        .unwrap();

        assert_eq!(catalog.translate("errors.required", "en").unwrap(), "Base required");
        assert_eq!(
            catalog.translate("validation.email.invalid", "en").unwrap(),
            "Invalid email"
        );
        assert!(matches!(
            catalog.translate("menu", "en"),
            Err(CatalogError::NotAString { .. })
        ));
        assert!(matches!(
            catalog.translate("hello", "de"),
            Err(CatalogError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("en"), Some(TranslationKey::language("en")));
        assert_eq!(
            parse_key("tr.validation"),
            Some(TranslationKey::namespaced("tr", "validation"))
        );
        assert_eq!(parse_key(".hidden"), None);
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("en.a.b"), None);
        assert_eq!(parse_key("..en"), None);
    }

    #[test]
    fn test_apply_rejects_codes_outside_the_directory() {
        let root = tempdir().unwrap();
        let catalog = FileCatalog::open(root.path().join("translations")).unwrap();

        let result = catalog.apply(
            &TranslationKey::language("../escaped"),
            table(json!({ "hello": "Hello" })),
        );
        assert!(matches!(result, Err(CatalogError::InvalidKey(_))));

        let result = catalog.apply(
            &TranslationKey::namespaced("en", "../../escaped"),
            table(json!({ "hello": "Hello" })),
        );
        assert!(matches!(result, Err(CatalogError::InvalidKey(_))));

        assert!(!root.path().join("escaped.json").exists());
        assert!(!root.path().join("translations").exists());
        assert!(catalog.keys().is_empty());
    }

    #[test]
    fn test_apply_reports_write_failure() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let catalog = FileCatalog::open(blocker.join("translations")).unwrap();
        let key = TranslationKey::language("en");

        let result = catalog.apply(&key, table(json!({ "hello": "Hello" })));

        assert!(matches!(result, Err(CatalogError::Backend(_))));
        assert!(catalog.keys().is_empty());
        assert!(matches!(
            catalog.translate("hello", "en"),
            Err(CatalogError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_open_skips_invalid_files() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("en.json"), "not json").unwrap();
        fs::write(dir.join("tr.json"), r#"{ "hello": "Merhaba" }"#).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let catalog = FileCatalog::open(dir).unwrap();

        assert_eq!(catalog.keys(), vec![TranslationKey::language("tr")]);
    }
}

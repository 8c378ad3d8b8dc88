//! In-memory locale store
//!
//! Maps lowercase locale identifiers to their key/value tables and keeps
//! track of the default locale. Loading a directory builds a complete,
//! fresh table set so the caller can swap it in wholesale; stale locales
//! from a previous load disappear on replace.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{LangError, Result};
use crate::format::{parse_str, LocaleTable};

/// Default file extension for language files
pub const DEFAULT_EXTENSION: &str = "lang";

/// Per-locale translation tables plus default-locale bookkeeping
#[derive(Debug, Clone)]
pub struct LocaleStore {
    /// Lowercase locale identifier -> key/value table
    tables: HashMap<String, LocaleTable>,
    /// Always stored lowercase
    default_locale: String,
    /// File extension (without dot) matched during directory loads
    extension: String,
}

impl LocaleStore {
    /// Creates an empty store with the given default locale.
    pub fn new(default_locale: &str) -> Self {
        Self::with_extension(default_locale, DEFAULT_EXTENSION)
    }

    /// Creates an empty store matching a custom file extension.
    pub fn with_extension(default_locale: &str, extension: &str) -> Self {
        Self {
            tables: HashMap::new(),
            default_locale: default_locale.to_lowercase(),
            extension: extension.to_string(),
        }
    }

    /// Sets the default locale (stored lowercase).
    pub fn set_default_locale(&mut self, locale: &str) {
        self.default_locale = locale.to_lowercase();
    }

    /// The current default locale.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// The file extension matched during directory loads.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Case-insensitive check whether a locale has a loaded table.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.tables.contains_key(&locale.to_lowercase())
    }

    /// All loaded locale identifiers.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Raw template lookup. `locale` must already be lowercase.
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Inserts or replaces one locale's table.
    pub fn insert_table(&mut self, locale: &str, table: LocaleTable) {
        self.tables.insert(locale.to_lowercase(), table);
    }

    /// Replaces every table at once (wholesale reload).
    pub fn replace_tables(&mut self, tables: HashMap<String, LocaleTable>) {
        self.tables = tables;
    }

    /// Default locale's table overlaid with the requested locale's table;
    /// the requested locale's keys win on conflict.
    ///
    /// This is the bulk-export shape for shipping all of a locale's
    /// strings to a client. Single-key resolution has different fallback
    /// semantics and does not go through here.
    pub fn merged_table(&self, locale: &str) -> LocaleTable {
        let mut merged = self
            .tables
            .get(&self.default_locale)
            .cloned()
            .unwrap_or_default();

        if let Some(table) = self.tables.get(&locale.to_lowercase()) {
            merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        merged
    }

    /// Parses every `*.<extension>` file in a directory into a fresh
    /// table set, keyed by lowercased filename stem.
    ///
    /// A file that cannot be read is skipped with a warning; only the
    /// directory listing itself is fatal.
    pub fn load_directory(dir: &Path, extension: &str) -> Result<HashMap<String, LocaleTable>> {
        let entries = fs::read_dir(dir).map_err(|source| LangError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut tables = HashMap::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(extension) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(text) => {
                    let locale = stem.to_lowercase();
                    let table = parse_str(&text);
                    debug!(locale = %locale, entries = table.len(), "loaded language file");
                    tables.insert(locale, table);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable language file");
                }
            }
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(pairs: &[(&str, &str)]) -> LocaleTable {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_locale_is_lowercased() {
        let mut store = LocaleStore::new("FR");
        assert_eq!(store.default_locale(), "fr");

        store.set_default_locale("En-US");
        assert_eq!(store.default_locale(), "en-us");
    }

    #[test]
    fn test_is_supported_case_insensitive() {
        let mut store = LocaleStore::new("en");
        store.insert_table("en", table(&[("hi", "Hello")]));

        assert!(store.is_supported("en"));
        assert!(store.is_supported("EN"));
        assert!(!store.is_supported("fr"));
    }

    #[test]
    fn test_empty_store_always_misses() {
        let store = LocaleStore::new("en");
        assert_eq!(store.get("en", "hi"), None);
        assert!(!store.is_supported("en"));
    }

    #[test]
    fn test_merged_table_requested_wins() {
        let mut store = LocaleStore::new("en");
        store.insert_table("en", table(&[("hi", "Hello"), ("bye", "Bye")]));
        store.insert_table("fr", table(&[("hi", "Bonjour")]));

        let merged = store.merged_table("fr");
        assert_eq!(merged.get("hi").map(String::as_str), Some("Bonjour"));
        assert_eq!(merged.get("bye").map(String::as_str), Some("Bye"));
    }

    #[test]
    fn test_merged_table_unknown_locale_is_default() {
        let mut store = LocaleStore::new("en");
        store.insert_table("en", table(&[("hi", "Hello")]));

        let merged = store.merged_table("de");
        assert_eq!(merged.get("hi").map(String::as_str), Some("Hello"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_replace_tables_is_wholesale() {
        let mut store = LocaleStore::new("en");
        store.insert_table("en", table(&[("hi", "Hello")]));
        store.insert_table("fr", table(&[("hi", "Bonjour")]));

        let mut fresh = HashMap::new();
        fresh.insert("en".to_string(), table(&[("hi", "Hi")]));
        store.replace_tables(fresh);

        assert!(store.is_supported("en"));
        assert!(!store.is_supported("fr"));
        assert_eq!(store.get("en", "hi"), Some("Hi"));
    }

    #[test]
    fn test_load_directory_filters_extension_and_lowercases_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("EN.lang"), "hi=Hello").unwrap();
        std::fs::write(dir.path().join("fr.lang"), "hi=Bonjour").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi=ignored").unwrap();

        let tables = LocaleStore::load_directory(dir.path(), "lang").unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(
            tables.get("en").and_then(|t| t.get("hi")).map(String::as_str),
            Some("Hello")
        );
        assert!(tables.contains_key("fr"));
    }

    #[test]
    fn test_load_directory_missing_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let err = LocaleStore::load_directory(&missing, "lang").unwrap_err();
        assert!(matches!(err, LangError::DirectoryRead { .. }));
    }

    #[test]
    fn test_load_directory_skips_unreadable_file() {
        // a directory named like a language file cannot be read as text;
        // loading must skip it and keep its siblings
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bad.lang")).unwrap();
        let mut f = std::fs::File::create(dir.path().join("en.lang")).unwrap();
        writeln!(f, "hi=Hello").unwrap();

        let tables = LocaleStore::load_directory(dir.path(), "lang").unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables.contains_key("en"));
    }
}

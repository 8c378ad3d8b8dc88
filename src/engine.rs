//! Resolution façade and expression evaluation
//!
//! [`Localizer`] owns the locale store behind a read/write lock and turns
//! `(locale, key, params)` into a final display string:
//!
//! 1. the requested locale's table is consulted first, then the default
//!    locale's table, then the `:key:` sentinel;
//! 2. the raw template's `${...}` placeholders are evaluated against the
//!    caller's params, with dotted path lookup (`${user.name}`),
//!    cross-message references (`${#other.key}`), and plural branch
//!    selection (`${n | one | many}`);
//! 3. nested references always resolve against the originally requested
//!    locale, even when the top-level lookup fell back to the default
//!    table.
//!
//! Importing a directory parses every language file into a fresh table
//! set without holding the lock, then swaps it in under a short write
//! section, so concurrent readers observe either the old or the new
//! tables in full.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::format::LocaleTable;
use crate::store::{LocaleStore, DEFAULT_EXTENSION};
use crate::template::{scan, Expr, Segment};

/// Bound on evaluation re-scans and `#`-reference chains. Reference
/// cycles and self-reintroducing values bottom out in a sentinel instead
/// of recursing forever.
const MAX_DEPTH: usize = 8;

/// Wraps unresolvable text in the `:text:` sentinel marker.
fn sentinel(text: &str) -> String {
    format!(":{text}:")
}

/// The localization engine's public entry point.
///
/// # Examples
///
/// ```
/// use langtable::Localizer;
/// use serde_json::json;
///
/// let localizer = Localizer::new("en");
/// localizer.insert_table(
///     "en",
///     [("greeting".to_string(), "Hi ${user.name}".to_string())].into(),
/// );
///
/// let text = localizer.get_item("en", "greeting", &json!({"user": {"name": "Ana"}}));
/// assert_eq!(text, "Hi Ana");
/// ```
#[derive(Debug)]
pub struct Localizer {
    store: RwLock<LocaleStore>,
}

impl Localizer {
    /// Creates an engine with the given default locale and the standard
    /// `.lang` file extension.
    pub fn new(default_locale: &str) -> Self {
        Self::with_extension(default_locale, DEFAULT_EXTENSION)
    }

    /// Creates an engine matching a custom language-file extension.
    pub fn with_extension(default_locale: &str, extension: &str) -> Self {
        Self {
            store: RwLock::new(LocaleStore::with_extension(default_locale, extension)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LocaleStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocaleStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the default locale (stored lowercase).
    pub fn set_default_locale(&self, locale: &str) {
        self.write().set_default_locale(locale);
    }

    /// The current default locale.
    pub fn default_locale(&self) -> String {
        self.read().default_locale().to_string()
    }

    /// Case-insensitive check whether a locale was loaded.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.read().is_supported(locale)
    }

    /// Parses every language file in `dir` and replaces the loaded
    /// tables wholesale. Returns the number of locales loaded.
    ///
    /// The new table set is built before the write lock is taken, so
    /// readers never observe a half-rebuilt store. Per-file problems are
    /// skipped; only listing the directory itself fails.
    pub fn import_language_directory(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let extension = self.read().extension().to_string();
        let tables = LocaleStore::load_directory(dir.as_ref(), &extension)?;
        let count = tables.len();

        self.write().replace_tables(tables);

        info!(locales = count, dir = %dir.as_ref().display(), "language directory imported");
        Ok(count)
    }

    /// Inserts or replaces one locale's table directly, bypassing the
    /// file system. Useful for built-in strings and tests.
    pub fn insert_table(&self, locale: &str, table: LocaleTable) {
        self.write().insert_table(locale, table);
    }

    /// Resolves a key for a locale into a final display string.
    ///
    /// Falls back from the requested locale to the default locale, and
    /// to the `:key:` sentinel when neither has the key. Never fails:
    /// every unresolvable placeholder degrades to its own sentinel.
    pub fn get_item(&self, locale: &str, key: &str, params: &Value) -> String {
        let store = self.read();
        resolve(&store, &locale.to_lowercase(), key, params, 0)
    }

    /// The default locale's table overlaid with the requested locale's
    /// table (requested keys win), for bulk export to a client.
    pub fn language_data(&self, locale: &str) -> HashMap<String, String> {
        self.read().merged_table(locale)
    }

    /// A handle bound to one locale, for handing to template rendering.
    /// An empty locale hint binds to the default locale.
    pub fn translator(&self, locale: &str) -> Translator<'_> {
        let locale = if locale.is_empty() {
            self.default_locale()
        } else {
            locale.to_lowercase()
        };
        Translator {
            localizer: self,
            locale,
        }
    }
}

/// A [`Localizer`] bound to a single locale
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    localizer: &'a Localizer,
    locale: String,
}

impl Translator<'_> {
    /// The bound locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolves `key` with `params` against the bound locale.
    pub fn t(&self, key: &str, params: &Value) -> String {
        self.localizer.get_item(&self.locale, key, params)
    }
}

/// Requested -> default -> sentinel lookup. `locale` is lowercase.
///
/// Evaluation always receives the requested locale, so `#` references
/// inside a default-table template still prefer the requester's locale.
fn resolve(store: &LocaleStore, locale: &str, key: &str, params: &Value, depth: usize) -> String {
    if let Some(template) = store.get(locale, key) {
        return evaluate(store, locale, template, params, depth);
    }

    if let Some(template) = store.get(store.default_locale(), key) {
        return evaluate(store, locale, template, params, depth);
    }

    sentinel(key)
}

/// Substitutes every placeholder in `template`, splicing computed values
/// by position between the literal spans.
///
/// A spliced value can complete an expression that was not well-formed on
/// this pass (a plural branch holding its own `${...}`), so the output is
/// re-evaluated until a pass changes nothing or `MAX_DEPTH` is reached.
fn evaluate(store: &LocaleStore, locale: &str, template: &str, params: &Value, depth: usize) -> String {
    let segments = scan(template);
    if !segments
        .iter()
        .any(|s| matches!(s, Segment::Placeholder { .. }))
    {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder { inner, expr } => {
                out.push_str(&eval_expr(store, locale, inner, &expr, params, depth));
            }
        }
    }

    if depth + 1 < MAX_DEPTH && out != template {
        evaluate(store, locale, &out, params, depth + 1)
    } else {
        out
    }
}

/// Computes the replacement value for one placeholder.
fn eval_expr(
    store: &LocaleStore,
    locale: &str,
    inner: &str,
    expr: &Expr,
    params: &Value,
    depth: usize,
) -> String {
    match expr {
        Expr::Reference(key) => {
            if depth + 1 < MAX_DEPTH {
                resolve(store, locale, key, params, depth + 1)
            } else {
                sentinel(inner)
            }
        }
        Expr::Path(path) => match lookup_path(params, path) {
            Some(value) => render_value(value),
            None => sentinel(inner),
        },
        Expr::Plural { count, branches } => {
            match lookup_path(params, count).and_then(coerce_number) {
                Some(n) => select_branch(n, branches).to_string(),
                None => sentinel(count),
            }
        }
        Expr::Invalid => sentinel(inner),
    }
}

/// Walks a dotted path through nested params objects.
fn lookup_path<'a>(params: &'a Value, path: &str) -> Option<&'a Value> {
    let mut value = params;
    for part in path.split('.') {
        value = value.as_object()?.get(part)?;
    }
    Some(value)
}

/// Renders a params value for splicing: strings verbatim, everything
/// else as its JSON text.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric coercion for the plural count. Stricter than loose string
/// arithmetic: an empty or non-numeric string is a failure, not zero.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Plural branch selection: `branches` holds 2 entries (singular,
/// plural) or 3 (zero, singular, plural). Count 0 always takes the first
/// branch; with only 2 branches the zero form doubles as the singular.
fn select_branch(count: f64, branches: &[String]) -> &str {
    if count == 0.0 {
        &branches[0]
    } else if count == 1.0 {
        if branches.len() == 2 {
            &branches[0]
        } else {
            &branches[1]
        }
    } else {
        &branches[branches.len() - 1]
    }
}

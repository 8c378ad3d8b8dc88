//! langtable: localization engine for `.lang` translation files
//!
//! This library loads human-authored translation files in a small text
//! format (one `key = value` entry per logical line, one file per
//! locale), stores them as per-locale tables, and resolves lookups into
//! final display strings through a template-expansion language:
//! - dotted variable paths: `Hi ${user.name}`
//! - plural selection: `${n | no items | one item | ${n} items}`
//! - cross-message references: `${#common.greeting}`
//!
//! Lookups fall back from the requested locale to the default locale and
//! finally to a `:key:` sentinel, so rendering never fails on a missing
//! translation.
//!
//! # Examples
//!
//! ```no_run
//! use langtable::Localizer;
//! use serde_json::json;
//!
//! let localizer = Localizer::new("en");
//! localizer.import_language_directory("resources/lang")?;
//!
//! let text = localizer.get_item("fr", "inbox.count", &json!({"n": 3}));
//! # Ok::<(), langtable::LangError>(())
//! ```

pub mod engine;
pub mod error;
pub mod format;
pub mod store;
pub mod template;

pub use engine::{Localizer, Translator};
pub use error::{LangError, Result};
pub use format::LocaleTable;
pub use store::LocaleStore;

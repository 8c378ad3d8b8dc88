//! `langtable` Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.
//!
//! Only one condition is fatal in this crate: failing to list the language
//! directory during an import. Per-file read problems are skipped with a
//! warning, and every template-level failure (missing variable, unknown
//! key, malformed plural expression) degrades to a renderable `:text:`
//! sentinel instead of an error, so a caller-facing template never fails
//! because of a missing translation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for `langtable`
#[derive(Error, Debug)]
pub enum LangError {
    #[error("Failed to list language directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for `langtable` operations
pub type Result<T> = std::result::Result<T, LangError>;

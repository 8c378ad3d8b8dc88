//! `.lang` file format parser
//!
//! One translation entry per logical line, `key = value`. Lines starting
//! with `//` or `#` are comments, lines without `=` are silently dropped,
//! and a value ending in a lone backslash continues on the following line:
//!
//! ```text
//! // greetings
//! hello = Hello, ${user.name}!
//! farewell = Goodbye \
//!            and see you soon
//! ```
//!
//! Parsing is a pure function of the file text; the locale identifier is
//! derived separately from the file name.

use std::collections::HashMap;

/// Flat key -> raw template mapping for one locale
pub type LocaleTable = HashMap<String, String>;

/// Continuation state while walking logical lines
enum State {
    /// Looking for the next `key = value` entry
    Scan,
    /// Accumulating continuation lines for an open entry
    Continue { key: String, value: String },
}

/// Parses one `.lang` file's text into a flat key/value table.
///
/// Later duplicate keys overwrite earlier ones (last write wins). A
/// continuation that runs off the end of the input closes with whatever
/// was accumulated.
///
/// # Examples
///
/// ```
/// use langtable::format::parse_str;
///
/// let table = parse_str("greeting = Hello\n// ignored\nfarewell = Bye");
/// assert_eq!(table.get("greeting").map(String::as_str), Some("Hello"));
/// assert_eq!(table.len(), 2);
/// ```
pub fn parse_str(text: &str) -> LocaleTable {
    // Any newline style; surrounding whitespace and empty lines never
    // reach the state machine.
    let lines = text
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let mut table = LocaleTable::new();
    let mut state = State::Scan;

    for line in lines {
        state = match state {
            State::Scan => scan_line(line, &mut table),
            State::Continue { key, mut value } => {
                value.push('\n');
                if is_continuation(line) {
                    value.push_str(line[..line.len() - 1].trim());
                    State::Continue { key, value }
                } else {
                    // closing line is appended as-is
                    value.push_str(line);
                    table.insert(key, value.trim().to_string());
                    State::Scan
                }
            }
        };
    }

    // continuation ran off the end of the input
    if let State::Continue { key, value } = state {
        table.insert(key, value.trim().to_string());
    }

    table
}

/// Handles one line in the `Scan` state.
fn scan_line(line: &str, table: &mut LocaleTable) -> State {
    // comment line
    if line.starts_with("//") || line.starts_with('#') {
        return State::Scan;
    }

    // split at the FIRST `=`; a line without one is malformed and dropped
    let Some((key, value)) = line.split_once('=') else {
        return State::Scan;
    };

    let key = key.trim().to_string();
    let value = value.trim();

    if is_continuation(value) {
        State::Continue {
            key,
            value: value[..value.len() - 1].trim().to_string(),
        }
    } else {
        table.insert(key, value.to_string());
        State::Scan
    }
}

/// True when a trimmed value ends in the lone-backslash continuation
/// marker. The two-character escaped form `\\` is not a marker.
fn is_continuation(value: &str) -> bool {
    value.ends_with('\\') && !value.ends_with("\\\\")
}

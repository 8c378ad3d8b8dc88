//! Template placeholder scanning
//!
//! Splits a raw template into literal spans and `${ ... }` placeholder
//! spans, and classifies each placeholder's inner text into an
//! expression. The scanner is a single forward pass; the caller builds
//! its output by copying literals and splicing computed values per
//! occurrence, so two placeholders that happen to render identical text
//! never interfere with each other.
//!
//! Placeholder content may not contain nested braces. A `${` with no
//! well-formed closing `}` is left as literal text, which also means the
//! scanner naturally finds an inner `${n}` inside an outer, not-yet
//! well-formed expression such as `${n | one | ${n} items}`.

/// A parsed `${...}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `${#some.key}`: resolve the rest as a message key
    Reference(String),
    /// `${user.name}`: dotted path into the caller's params
    Path(String),
    /// `${count | zero | singular | plural}` or
    /// `${count | singular | plural}`: numeric branch selection
    Plural {
        count: String,
        branches: Vec<String>,
    },
    /// Pipe expression with a part count other than 3 or 4
    Invalid,
}

impl Expr {
    /// Classifies trimmed placeholder content.
    pub fn parse(inner: &str) -> Self {
        if !inner.contains('|') {
            return match inner.strip_prefix('#') {
                Some(key) => Self::Reference(key.to_string()),
                None => Self::Path(inner.to_string()),
            };
        }

        let parts: Vec<&str> = inner.split('|').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Self::Invalid;
        }

        Self::Plural {
            count: parts[0].to_string(),
            branches: parts[1..].iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// One span of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied through untouched
    Literal(&'a str),
    /// A `${...}` occurrence: trimmed inner content plus its parse
    Placeholder { inner: &'a str, expr: Expr },
}

/// Scans a template into ordered literal and placeholder spans.
///
/// # Examples
///
/// ```
/// use langtable::template::{scan, Expr, Segment};
///
/// let segments = scan("Hi ${ user.name }!");
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Literal("Hi "),
///         Segment::Placeholder {
///             inner: "user.name",
///             expr: Expr::Path("user.name".to_string()),
///         },
///         Segment::Literal("!"),
///     ]
/// );
/// ```
pub fn scan(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] != b'$' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }

        match find_close(bytes, i + 2) {
            Some(end) if end > i + 2 => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                let inner = template[i + 2..end].trim();
                segments.push(Segment::Placeholder {
                    inner,
                    expr: Expr::parse(inner),
                });
                i = end + 1;
                literal_start = i;
            }
            // `${}` or no valid close: stays literal, keep scanning so an
            // inner `${...}` can still match
            _ => i += 1,
        }
    }

    if literal_start < template.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    segments
}

/// Index of the `}` closing a placeholder opened before `from`, or `None`
/// if a nested brace or end of input is hit first.
fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    for (offset, byte) in bytes[from..].iter().enumerate() {
        match byte {
            b'}' => return Some(from + offset),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(template: &str) -> Vec<&str> {
        scan(template)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder { inner, .. } => Some(inner),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_scan_plain_text() {
        let segments = scan("no placeholders here");
        assert_eq!(segments, vec![Segment::Literal("no placeholders here")]);
    }

    #[test]
    fn test_scan_whitespace_is_insignificant() {
        assert_eq!(placeholders("${ user.name }"), vec!["user.name"]);
        assert_eq!(placeholders("${user.name}"), vec!["user.name"]);
    }

    #[test]
    fn test_scan_multiple_occurrences() {
        assert_eq!(placeholders("${a} and ${b} and ${a}"), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_scan_unclosed_is_literal() {
        let segments = scan("broken ${a");
        assert_eq!(segments, vec![Segment::Literal("broken ${a")]);
    }

    #[test]
    fn test_scan_empty_braces_are_literal() {
        let segments = scan("odd ${} text");
        assert_eq!(segments, vec![Segment::Literal("odd ${} text")]);
    }

    #[test]
    fn test_scan_nested_brace_matches_inner() {
        // the outer expression holds a nested `${n}`, so only the inner
        // span is a placeholder on this pass
        assert_eq!(placeholders("${n | one | ${n} items}"), vec!["n"]);
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(Expr::parse("user.name"), Expr::Path("user.name".to_string()));
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            Expr::parse("#common.greeting"),
            Expr::Reference("common.greeting".to_string())
        );
    }

    #[test]
    fn test_parse_plural_three_parts() {
        assert_eq!(
            Expr::parse("n | one item | ${n} items"),
            Expr::Plural {
                count: "n".to_string(),
                branches: vec!["one item".to_string(), "${n} items".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_plural_four_parts() {
        assert_eq!(
            Expr::parse("n|none|one|many"),
            Expr::Plural {
                count: "n".to_string(),
                branches: vec!["none".to_string(), "one".to_string(), "many".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_wrong_part_count_is_invalid() {
        assert_eq!(Expr::parse("n | only-two"), Expr::Invalid);
        assert_eq!(Expr::parse("a|b|c|d|e"), Expr::Invalid);
    }
}

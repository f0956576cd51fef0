//! The line-oriented `key=value` text format.
//!
//! ```text
//! # comment
//! // also a comment
//! process.name = order-service
//! greeting = hello\tworld
//! ```
//!
//! Reading trims every line, drops blank and comment lines, splits each
//! remaining line at its first `=` and decodes escapes in the value. Lines
//! without `=` are ignored. Writing emits `key=value\n` per entry without
//! any escaping.

use bytes::Bytes;

use crate::error::EscapeError;
use crate::escape::unescape;
use crate::view::Mapping;

/// Whether a trimmed line is a comment.
fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

/// Splits `text` into trimmed, non-empty lines.
///
/// With `remove_comments`, lines starting with `#` or `//` are dropped too.
pub fn lines(text: &str, remove_comments: bool) -> Vec<&str> {
    numbered_lines(text, remove_comments)
        .map(|(_, line)| line)
        .collect()
}

fn numbered_lines(text: &str, remove_comments: bool) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(move |(_, line)| !line.is_empty() && !(remove_comments && is_comment(line)))
}

/// A line dropped from a parse because its value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// The trimmed line.
    pub line: String,
    /// Why the value was rejected.
    pub error: EscapeError,
}

/// Outcome of parsing a text document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Entries in first-seen key order; the last occurrence of a key wins.
    pub mapping: Mapping,
    /// Lines whose value held a malformed escape.
    pub skipped: Vec<SkippedLine>,
}

impl ParseReport {
    /// Whether every `key=value` line was accepted.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Parses raw bytes (decoded as UTF-8, lossy) into a mapping.
///
/// Never fails: a line whose value holds a malformed escape is recorded in
/// [`ParseReport::skipped`] and parsing continues with the next line.
///
/// # Example
///
/// ```
/// use logconf_config::parse_text;
///
/// let report = parse_text(b"# comment\n\nkey=val\n// also comment\n");
/// assert_eq!(report.mapping.len(), 1);
/// assert_eq!(report.mapping["key"], "val");
/// ```
pub fn parse_text(bytes: &[u8]) -> ParseReport {
    let text = String::from_utf8_lossy(bytes);
    let mut report = ParseReport::default();

    for (line_number, line) in numbered_lines(&text, true) {
        let Some((key, rest)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let rest = rest.trim();

        if rest.is_empty() {
            report.mapping.insert(key.to_string(), String::new());
            continue;
        }

        match unescape(rest) {
            Ok(value) => {
                report.mapping.insert(key.to_string(), value.into_owned());
            }
            Err(error) => report.skipped.push(SkippedLine {
                line_number,
                line: line.to_string(),
                error,
            }),
        }
    }

    report
}

/// Serializes a mapping as `key=value\n` lines in iteration order.
///
/// An empty mapping yields empty content. Values are written verbatim.
pub fn serialize(map: &Mapping) -> Bytes {
    if map.is_empty() {
        return Bytes::new();
    }

    let capacity = map.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let mut out = String::with_capacity(capacity);
    for (key, value) in map {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    Bytes::from(out)
}

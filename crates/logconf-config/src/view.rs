//! Typed read access over immutable key-value mappings.
//!
//! [`TypedView`] wraps a shared, never-mutated [`Mapping`]. Every merge
//! produces a new mapping, so a view handed out earlier keeps seeing the
//! values it was created with.
//!
//! Typed getters are permissive: a value that does not parse as the
//! requested type is treated exactly like a missing one and the caller's
//! default is returned. The parse rules live in the `parse_*` helpers of
//! this module.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

/// Flat string-keyed configuration mapping.
///
/// Insertion order is kept so that serialization, and therefore the content
/// fingerprint, is deterministic.
pub type Mapping = IndexMap<String, String>;

/// Parses an `i32` value; `None` for empty or malformed input.
pub fn parse_int(value: &str) -> Option<i32> {
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// Parses an `i64` value; `None` for empty or malformed input.
pub fn parse_long(value: &str) -> Option<i64> {
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// Parses an `f64` value; `None` for empty or malformed input.
///
/// Accepts the JVM decimal grammar rather than Rust's: surrounding
/// whitespace is ignored, one trailing `f`/`F`/`d`/`D` suffix is allowed, and
/// the only special values are `Infinity` and `NaN` (optionally signed,
/// case-sensitive). Rust-only spellings such as `inf` or `nan` are rejected.
pub fn parse_double(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    if matches!(unsigned, "Infinity" | "NaN") {
        return trimmed.parse().ok();
    }
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let body = trimmed
        .strip_suffix(['f', 'F', 'd', 'D'])
        .unwrap_or(trimmed);
    body.parse().ok()
}

/// Parses a boolean value; `None` only for empty input.
///
/// Any non-empty value other than a case-insensitive `"true"` is `false`.
pub fn parse_bool(value: &str) -> Option<bool> {
    if value.is_empty() {
        return None;
    }
    Some(value.eq_ignore_ascii_case("true"))
}

/// Typed accessors with default fallback.
///
/// Implementors only provide [`TypedAccess::get`]; all typed getters are
/// derived from it and never fail.
pub trait TypedAccess {
    /// Returns the raw value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the value for `key`, or `default` when absent.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Returns the value for `key` as `i32`, or `default` when absent or malformed.
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|v| parse_int(&v))
            .unwrap_or(default)
    }

    /// Returns the value for `key` as `i64`, or `default` when absent or malformed.
    fn get_long(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| parse_long(&v))
            .unwrap_or(default)
    }

    /// Returns the value for `key` as `f64`, or `default` when absent or malformed.
    fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| parse_double(&v))
            .unwrap_or(default)
    }

    /// Returns `true` iff the value equals `"true"` ignoring case.
    ///
    /// Absent or empty values yield `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }

    /// Returns whether `key` is present.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Read-only view over an immutable [`Mapping`].
///
/// Cloning a view is cheap; clones share the same mapping.
///
/// # Example
///
/// ```
/// use logconf_config::{TypedAccess, TypedView};
///
/// let base: TypedView = [("port", "8080"), ("debug", "TRUE")].into_iter().collect();
/// let merged = base.merge([("port", "9090")]);
///
/// assert_eq!(base.get_int("port", 0), 8080);
/// assert_eq!(merged.get_int("port", 0), 9090);
/// assert!(merged.get_bool("debug", false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedView {
    map: Arc<Mapping>,
}

impl TypedView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a view that takes ownership of `map`.
    #[must_use]
    pub fn from_mapping(map: Mapping) -> Self {
        Self { map: Arc::new(map) }
    }

    /// Looks up `key` without copying the value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// The backing mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.map
    }

    /// A shared handle to the backing mapping.
    pub fn snapshot(&self) -> Arc<Mapping> {
        Arc::clone(&self.map)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the view has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a new view containing this view's entries overlaid with `other`.
    ///
    /// Entries of `other` win on key collision. Existing keys keep their
    /// position; new keys are appended. `self` is left untouched.
    #[must_use]
    pub fn merge<I, K, V>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = Mapping::clone(&self.map);
        merged.extend(other.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self::from_mapping(merged)
    }
}

impl TypedAccess for TypedView {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
}

impl From<Mapping> for TypedView {
    fn from(map: Mapping) -> Self {
        Self::from_mapping(map)
    }
}

impl From<HashMap<String, String>> for TypedView {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypedView {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

//! Three-tier precedence merge.
//!
//! This module provides the [`LayeredResolver`] that folds defaults, an
//! optional configuration file and environment overrides into one
//! [`ContentStore`].

use std::fmt;

use bytes::Bytes;

use crate::store::ContentStore;
use crate::view::{Mapping, TypedView};

/// One ordered input to the precedence merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Built-in defaults (lowest precedence).
    Defaults,
    /// The discovered configuration file.
    File,
    /// Process environment / property overrides (highest precedence).
    Environment,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Defaults => "defaults",
            Self::File => "file",
            Self::Environment => "environment",
        })
    }
}

/// Layered configuration resolver.
///
/// Layers are applied in a fixed order regardless of the order the builder
/// methods are called in; later layers override earlier ones:
/// 1. Defaults
/// 2. File content
/// 3. Environment
///
/// The resolver never performs I/O and never fails. A missing file is an
/// empty layer; a file line with a malformed escape is skipped.
///
/// # Example
///
/// ```
/// use logconf_config::{LayeredResolver, TypedAccess};
///
/// let store = LayeredResolver::new()
///     .with_defaults([("a", "1"), ("b", "2")])
///     .with_file("a=10")
///     .with_env([("b", "20")])
///     .resolve();
///
/// assert_eq!(store.get_int("a", 0), 10);
/// assert_eq!(store.get_int("b", 0), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayeredResolver {
    defaults: Mapping,
    file: Option<Bytes>,
    env: Mapping,
}

impl LayeredResolver {
    /// Create a resolver with every layer empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds entries to the defaults layer.
    #[must_use]
    pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.defaults, defaults);
        self
    }

    /// Sets the raw bytes of the file layer.
    #[must_use]
    pub fn with_file(mut self, content: impl Into<Bytes>) -> Self {
        self.file = Some(content.into());
        self
    }

    /// Sets the file layer if `content` is present, clears it otherwise.
    #[must_use]
    pub fn with_optional_file(mut self, content: Option<Bytes>) -> Self {
        self.file = content;
        self
    }

    /// Adds entries to the environment layer.
    #[must_use]
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        extend(&mut self.env, env);
        self
    }

    /// Merges the layers and returns the resulting store.
    pub fn resolve(self) -> ContentStore {
        let mut result = TypedView::from_mapping(self.defaults);
        tracing::debug!(
            layer = %Layer::Defaults,
            entries = result.len(),
            "applied configuration layer"
        );

        if let Some(content) = self.file {
            let file = ContentStore::from_text(content).get_all();
            result = apply(&result, Layer::File, &file);
        }

        result = apply(&result, Layer::Environment, &self.env);

        ContentStore::from_view(result)
    }
}

/// Resolves `defaults < file < env` into one store.
///
/// Free-function form of [`LayeredResolver`].
pub fn resolve(defaults: &Mapping, file: Option<&[u8]>, env: &Mapping) -> ContentStore {
    LayeredResolver::new()
        .with_defaults(defaults)
        .with_optional_file(file.map(Bytes::copy_from_slice))
        .with_env(env)
        .resolve()
}

fn extend<I, K, V>(target: &mut Mapping, items: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    target.extend(items.into_iter().map(|(k, v)| (k.into(), v.into())));
}

fn apply(base: &TypedView, layer: Layer, overrides: &Mapping) -> TypedView {
    if overrides.is_empty() {
        tracing::debug!(layer = %layer, "configuration layer is empty");
        return base.clone();
    }

    let replaced = overrides
        .iter()
        .filter(|(k, v)| base.get_str(k).is_some_and(|old| old != v.as_str()))
        .count();
    let added = overrides.keys().filter(|k| base.get_str(k).is_none()).count();
    tracing::debug!(
        layer = %layer,
        entries = overrides.len(),
        replaced,
        added,
        "applied configuration layer"
    );

    base.merge(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypedAccess;

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_precedence() {
        let store = resolve(
            &mapping(&[("a", "1"), ("b", "2")]),
            Some("a=10".as_bytes()),
            &mapping(&[("b", "20")]),
        );
        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"], "10");
        assert_eq!(all["b"], "20");
    }

    #[test]
    fn test_env_overrides_file() {
        let store = resolve(
            &Mapping::new(),
            Some("a=file\nb=file".as_bytes()),
            &mapping(&[("a", "env")]),
        );
        assert_eq!(store.get("a"), Some("env".to_string()));
        assert_eq!(store.get("b"), Some("file".to_string()));
    }

    #[test]
    fn test_missing_file_is_empty_layer() {
        let store = resolve(&mapping(&[("a", "1")]), None, &Mapping::new());
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.content_string(), "a=1\n");
    }

    #[test]
    fn test_comment_only_file_is_noop() {
        let store = resolve(
            &mapping(&[("a", "1")]),
            Some("# nothing here\n\n// or here\n".as_bytes()),
            &Mapping::new(),
        );
        assert_eq!(store.get_all().len(), 1);
        assert_eq!(store.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_malformed_file_line_keeps_default() {
        let store = resolve(
            &mapping(&[("a", "1"), ("b", "2")]),
            Some("a=\\uXYZW\nb=3".as_bytes()),
            &Mapping::new(),
        );
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.get("b"), Some("3".to_string()));
    }

    #[test]
    fn test_result_is_parsed_with_regenerated_content() {
        let store = LayeredResolver::new()
            .with_defaults([("a", "1")])
            .with_file("# c\nb = two\n")
            .resolve();
        assert!(store.is_parsed());
        assert_eq!(store.content_string(), "a=1\nb=two\n");
    }

    #[test]
    fn test_builder_order_does_not_matter() {
        let store = LayeredResolver::new()
            .with_env([("k", "env")])
            .with_file("k=file")
            .with_defaults([("k", "default")])
            .resolve();
        assert_eq!(store.get("k"), Some("env".to_string()));
    }

    #[test]
    fn test_with_optional_file() {
        let store = LayeredResolver::new()
            .with_file("k=file")
            .with_optional_file(None)
            .with_defaults([("k", "default")])
            .resolve();
        assert_eq!(store.get("k"), Some("default".to_string()));
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(Layer::Defaults.to_string(), "defaults");
        assert_eq!(Layer::File.to_string(), "file");
        assert_eq!(Layer::Environment.to_string(), "environment");
        assert!(Layer::Defaults < Layer::Environment);
    }
}

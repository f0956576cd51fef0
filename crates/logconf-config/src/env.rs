//! Environment overrides.
//!
//! Collects the highest-precedence layer from process environment variables
//! or `.env` files. Values containing a backslash are dropped.

use std::path::Path;

use crate::error::ConfigError;
use crate::view::{Mapping, TypedAccess};

/// Separator between the prefix and key segments in prefixed variables.
const SEGMENT_SEPARATOR: &str = "__";

/// Environment-derived configuration overrides.
///
/// # Example
///
/// ```
/// use logconf_config::EnvOverrides;
///
/// let env = EnvOverrides::from_vars_with_prefix(
///     [
///         ("LOGCONF__PROCESS__APP_ID", "42"),
///         ("LOGCONF__CONFIG__PATH", "C:\\conf"),
///         ("HOME", "/root"),
///     ],
///     "logconf",
/// );
///
/// assert_eq!(env.get_str("process.appId"), Some("42"));
/// assert_eq!(env.get_str("config.path"), None);
/// assert_eq!(env.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    vars: Mapping,
}

impl EnvOverrides {
    /// Create an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every variable as-is, except values containing a backslash.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut overrides = Self::new();
        for (key, value) in vars {
            overrides.insert(key.into(), value.into());
        }
        overrides
    }

    /// Takes only `PREFIX__SEGMENT__...` variables and maps them to dotted keys.
    ///
    /// The prefix is matched case-insensitively. Each segment becomes
    /// lower camel case, so `PREFIX__PROCESS__APP_ID` yields
    /// `process.appId` and `PREFIX__SPRING__PROFILES__ACTIVE` yields
    /// `spring.profiles.active`.
    pub fn from_vars_with_prefix<I, K, V>(vars: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = prefix.to_uppercase();
        let mut overrides = Self::new();
        for (key, value) in vars {
            let key = key.into();
            if let Some(dotted) = prefixed_key(&key, &prefix) {
                overrides.insert(dotted, value.into());
            }
        }
        overrides
    }

    /// Reads the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are ignored.
    pub fn from_process() -> Self {
        Self::from_vars(process_vars())
    }

    /// Reads prefixed variables from the current process environment.
    pub fn from_process_with_prefix(prefix: &str) -> Self {
        Self::from_vars_with_prefix(process_vars(), prefix)
    }

    /// Reads a `.env` file without touching the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or has a malformed line.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(|e| dotenv_error(path, e))?;

        let mut overrides = Self::new();
        for item in iter {
            let (key, value) = item.map_err(|e| dotenv_error(path, e))?;
            overrides.insert(key, value);
        }
        Ok(overrides)
    }

    fn insert(&mut self, key: String, value: String) {
        if value.contains('\\') {
            tracing::debug!(key = %key, "ignoring environment override containing a backslash");
            return;
        }
        self.vars.insert(key, value);
    }

    /// Returns a new set where entries of `other` win on collision.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.vars.extend(other.vars);
        self
    }

    /// Looks up `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// The collected overrides.
    pub fn mapping(&self) -> &Mapping {
        &self.vars
    }

    /// Consumes the set, returning the collected overrides.
    pub fn into_mapping(self) -> Mapping {
        self.vars
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl TypedAccess for EnvOverrides {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}

fn dotenv_error(path: &Path, error: dotenvy::Error) -> ConfigError {
    match error {
        dotenvy::Error::Io(source) => ConfigError::read_error(path, source),
        other => ConfigError::env_parse_error(path.display().to_string(), other.to_string()),
    }
}

/// Maps `PREFIX__A__B_C` to `a.bC`; `None` when the prefix does not match.
fn prefixed_key(key: &str, prefix: &str) -> Option<String> {
    let rest = key
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &key[prefix.len()..])?
        .strip_prefix(SEGMENT_SEPARATOR)?;

    let segments: Vec<String> = rest
        .split(SEGMENT_SEPARATOR)
        .map(lower_camel)
        .collect();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments.join("."))
}

fn lower_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (idx, word) in segment.split('_').filter(|w| !w.is_empty()).enumerate() {
        let lower = word.to_lowercase();
        if idx == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

//! Process-wide application configuration.
//!
//! [`ApplicationConfig`] is built once at start-up from built-in defaults,
//! the discovered properties file and environment overrides, then shared as
//! a cloneable handle with everything that reads configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::discovery::{ConfigDiscovery, DiscoveredFile};
use crate::env::EnvOverrides;
use crate::resolver::LayeredResolver;
use crate::store::ContentStore;
use crate::view::{Mapping, TypedAccess};

/// Numeric application id.
pub const APP_ID_KEY: &str = "process.appId";
/// Process (service) name.
pub const NAME_KEY: &str = "process.name";
/// Active profile.
pub const PROFILE_KEY: &str = "process.profile";
/// Profile fallback honoured for Spring-style deployments.
pub const SPRING_PROFILE_KEY: &str = "spring.profiles.active";

const DEFAULT_APP_ID: &str = "0";
const DEFAULT_NAME: &str = "unknown";
const DEFAULT_PROFILE: &str = "develop";

/// The active profile: `process.profile`, else `spring.profiles.active`,
/// else `develop`.
pub fn active_profile(env: &EnvOverrides) -> String {
    env.get_str(PROFILE_KEY)
        .or_else(|| env.get_str(SPRING_PROFILE_KEY))
        .unwrap_or(DEFAULT_PROFILE)
        .to_string()
}

/// Built-in defaults for the process identity keys.
pub fn default_layer(env: &EnvOverrides) -> Mapping {
    let mut defaults = Mapping::new();
    defaults.insert(APP_ID_KEY.to_string(), env.get_or(APP_ID_KEY, DEFAULT_APP_ID));
    defaults.insert(NAME_KEY.to_string(), env.get_or(NAME_KEY, DEFAULT_NAME));
    defaults.insert(PROFILE_KEY.to_string(), active_profile(env));
    defaults
}

/// Resolved application configuration.
///
/// Cloning is cheap: clones share one [`ContentStore`].
///
/// # Example
///
/// ```
/// use logconf_config::{ApplicationConfig, EnvOverrides, TypedAccess};
///
/// let env = EnvOverrides::from_vars([("process.name", "orders")]);
/// let config = ApplicationConfig::from_parts(
///     logconf_config::default_layer(&env),
///     None,
///     &env,
/// );
///
/// assert_eq!(config.get_or("process.name", ""), "orders");
/// assert_eq!(config.get_long("process.appId", -1), 0);
/// assert_eq!(config.profile(), "develop");
/// ```
#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    store: Arc<ContentStore>,
    source: Option<PathBuf>,
}

impl ApplicationConfig {
    /// Discovers the properties file for the active profile and resolves
    /// defaults < file < `env`.
    pub fn load(discovery: &ConfigDiscovery, env: &EnvOverrides) -> Self {
        let profile = active_profile(env);
        let file = discovery.discover(Some(&profile));
        Self::from_parts(default_layer(env), file, env)
    }

    /// Resolves already collected layers without touching the file system.
    pub fn from_parts(defaults: Mapping, file: Option<DiscoveredFile>, env: &EnvOverrides) -> Self {
        let (source, content) = match file {
            Some(DiscoveredFile { path, content }) => (Some(path), Some(content)),
            None => (None, None),
        };

        let store = LayeredResolver::new()
            .with_defaults(defaults)
            .with_optional_file(content)
            .with_env(env.mapping())
            .resolve();

        tracing::debug!(
            source = ?source,
            entries = store.get_all().len(),
            fingerprint = %store.fingerprint(),
            "resolved application config"
        );

        Self {
            store: Arc::new(store),
            source,
        }
    }

    /// The resolved store.
    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// The file the configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The resolved `process.profile`.
    pub fn profile(&self) -> String {
        self.store.get_or(PROFILE_KEY, DEFAULT_PROFILE)
    }
}

impl TypedAccess for ApplicationConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}

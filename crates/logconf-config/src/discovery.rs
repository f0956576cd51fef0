//! Configuration file discovery.
//!
//! Locates the application properties file for the active profile and the
//! local configuration directory. Discovery only hands bytes to the engine;
//! an unreadable file is logged and treated as absent.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::env::EnvOverrides;

/// Key naming an explicit local configuration directory.
pub const CONFIG_PATH_KEY: &str = "config.path";

/// Directory created next to a marker entry to hold local configuration.
pub const AUTOCONF_DIR: &str = "autoconf";

/// Entries whose presence marks a directory as a configuration root.
const MARKERS: [&str; 5] = [
    AUTOCONF_DIR,
    "log4j.properties",
    "logback.xml",
    "logback-test.xml",
    "application.properties",
];

const DEFAULT_NAMES: [&str; 2] = ["application-default.properties", "application.properties"];

/// A configuration file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Where the file was found.
    pub path: PathBuf,
    /// Its raw content.
    pub content: Bytes,
}

/// Searches an ordered list of root directories for configuration files.
///
/// # Example
///
/// ```no_run
/// use logconf_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new().with_root("/etc/my-service");
/// if let Some(file) = discovery.discover(Some("production")) {
///     println!("using {}", file.path.display());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigDiscovery {
    roots: Vec<PathBuf>,
}

impl ConfigDiscovery {
    /// Create a discovery with no search roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches the working directory, then the executable's directory.
    #[must_use]
    pub fn standard() -> Self {
        let mut discovery = Self::new();
        if let Ok(cwd) = std::env::current_dir() {
            discovery = discovery.with_root(cwd);
        }
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            discovery = discovery.with_root(dir);
        }
        discovery
    }

    /// Appends a search root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        self
    }

    /// The search roots, in order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// File names to try for `profile`, most specific first.
    ///
    /// ```
    /// use logconf_config::ConfigDiscovery;
    ///
    /// assert_eq!(
    ///     ConfigDiscovery::candidate_names(Some("test")),
    ///     vec![
    ///         "application-test.properties",
    ///         "application-default.properties",
    ///         "application.properties",
    ///     ]
    /// );
    /// ```
    pub fn candidate_names(profile: Option<&str>) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_NAMES.iter().map(ToString::to_string).collect();
        if let Some(profile) = profile.filter(|p| !p.is_empty()) {
            let name = format!("application-{profile}.properties");
            if !names.contains(&name) {
                names.insert(0, name);
            }
        }
        names
    }

    /// Returns the first readable candidate file for `profile`.
    ///
    /// Candidates are tried in [`ConfigDiscovery::candidate_names`] order;
    /// for each name the first root holding it is used. A file that exists
    /// but cannot be read is logged and the next name is tried.
    pub fn discover(&self, profile: Option<&str>) -> Option<DiscoveredFile> {
        for name in Self::candidate_names(profile) {
            let Some(path) = self.find(&name) else {
                continue;
            };
            match fs::read(&path) {
                Ok(content) => {
                    tracing::info!(path = %path.display(), "loaded application config");
                    return Some(DiscoveredFile {
                        path,
                        content: Bytes::from(content),
                    });
                }
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "cannot load application config"
                    );
                }
            }
        }
        tracing::debug!(roots = ?self.roots, "no application config found");
        None
    }

    /// Resolves the local configuration directory.
    ///
    /// 1. `config.path` from `env`, created if missing;
    /// 2. an `autoconf` directory beside the first marker entry found in the
    ///    search roots, created if missing;
    /// 3. the system temporary directory.
    pub fn config_path(&self, env: &EnvOverrides) -> PathBuf {
        if let Some(explicit) = env.get_str(CONFIG_PATH_KEY).filter(|p| !p.is_empty()) {
            let path = PathBuf::from(explicit);
            if let Err(e) = fs::create_dir_all(&path) {
                tracing::warn!(path = %path.display(), error = %e, "cannot create config.path");
            }
            return path;
        }

        for marker in MARKERS {
            let Some(found) = self.find(marker) else {
                continue;
            };
            let Some(base) = found.parent().map(|p| p.join(AUTOCONF_DIR)) else {
                continue;
            };
            if base.is_dir() || fs::create_dir(&base).is_ok() {
                return base;
            }
        }

        std::env::temp_dir()
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(name))
            .find(|path| path.exists())
    }
}

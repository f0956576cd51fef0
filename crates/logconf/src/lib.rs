//! # logconf
//!
//! **Layered key-value application configuration**
//!
//! logconf resolves a process's configuration from three layers and keeps
//! both the raw text and a typed view of it:
//!
//! - **Layering**: built-in defaults < properties file < environment
//! - **Lazy parsing**: text becomes a mapping on first lookup, once
//! - **Typed getters**: malformed or missing values fall back to defaults
//! - **Fingerprints**: 128-bit content hashes for cheap change detection
//! - **Logging**: `tracing` output configured from the same layers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use logconf::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let boot = logconf::bootstrap(
//!         &ConfigDiscovery::standard(),
//!         &EnvOverrides::from_process(),
//!         &StaticHost::default(),
//!     )?;
//!
//!     let pool = boot.config.get_int("db.pool.size", 8);
//!     tracing::info!(pool, app_id = boot.process.app_id, "ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ConfigDiscovery ─▶ application-{profile}.properties ─┐
//! default_layer(env) ──────────────────────────────────┼─▶ LayeredResolver ─▶ ContentStore
//! EnvOverrides ────────────────────────────────────────┘                        │
//!                                                       ┌────────────────────────┤
//!                                                       ▼                        ▼
//!                                                  LogConfig               ProcessInfo
//! ```

#![doc(html_root_url = "https://docs.rs/logconf/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use logconf_config::{ApplicationConfig, ConfigDiscovery, EnvOverrides, HostInfo, ProcessInfo};
use logconf_telemetry::{init_logging, LogConfig, TelemetryResult};

// Re-export the configuration engine
pub use logconf_config as config;

// Re-export logging setup
pub use logconf_telemetry as telemetry;

/// Everything a process needs from start-up configuration.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// The resolved configuration.
    pub config: ApplicationConfig,
    /// The resolved process identity.
    pub process: ProcessInfo,
}

/// Loads the application configuration, installs logging from it and
/// resolves the process identity.
///
/// `process.path` is set to the local configuration directory chosen by
/// [`ConfigDiscovery::config_path`].
///
/// # Errors
///
/// Returns an error if the `logging.*` keys are unusable or a global
/// subscriber is already installed.
pub fn bootstrap(
    discovery: &ConfigDiscovery,
    env: &EnvOverrides,
    host: &dyn HostInfo,
) -> TelemetryResult<Bootstrap> {
    let config = ApplicationConfig::load(discovery, env);
    init_logging(&LogConfig::from_config(&config)?)?;

    let path = discovery.config_path(env);
    let process =
        ProcessInfo::resolve(&config, env, host).with_path(path.to_string_lossy().into_owned());

    tracing::info!(
        source = ?config.source(),
        fingerprint = %config.store().fingerprint(),
        "configuration loaded"
    );
    Ok(Bootstrap { config, process })
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use logconf::prelude::*;
/// ```
pub mod prelude {
    pub use logconf_config::{
        ApplicationConfig, ConfigDiscovery, ConfigError, ContentStore, EnvOverrides, Fingerprint,
        HostInfo, LayeredResolver, Mapping, ProcessInfo, StaticHost, TypedAccess, TypedView,
    };

    pub use logconf_telemetry::{init_logging, LogConfig, LogFormat, TelemetryError};

    pub use crate::{bootstrap, Bootstrap};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bootstrap_without_logging() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("application-prod.properties"),
            "process.name=orders\nprocess.appId=42\nprocess.port=8080\n",
        )
        .unwrap();

        let env = EnvOverrides::from_vars([
            ("process.profile", "prod"),
            ("logging.enabled", "false"),
        ]);
        let discovery = ConfigDiscovery::new().with_root(dir.path());
        let host = StaticHost {
            ip: "10.1.2.3".to_string(),
            http_port: None,
        };

        let boot = bootstrap(&discovery, &env, &host).unwrap();
        assert_eq!(boot.config.profile(), "prod");
        assert_eq!(boot.process.app_id, 42);
        assert_eq!(boot.process.name.as_deref(), Some("orders"));
        assert_eq!(boot.process.ip.as_deref(), Some("10.1.2.3"));
        assert_eq!(boot.process.port.as_deref(), Some("8080"));
        assert_eq!(
            boot.process.profile_priority(),
            vec!["10.1.2.3:8080", "10.1.2.3", "prod", "orders"]
        );
        assert!(boot.process.path.is_some());
    }

    #[test]
    fn test_bootstrap_rejects_bad_logging_config() {
        let env = EnvOverrides::from_vars([("logging.format", "xml")]);
        let result = bootstrap(&ConfigDiscovery::new(), &env, &StaticHost::default());
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))));
    }
}

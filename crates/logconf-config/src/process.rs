//! Process identity resolved from configuration.

use serde::Serialize;

use crate::application::{APP_ID_KEY, NAME_KEY, PROFILE_KEY};
use crate::env::EnvOverrides;
use crate::view::TypedAccess;

/// Explicit process address.
pub const IP_KEY: &str = "process.ip";
/// Explicit process port.
pub const PORT_KEY: &str = "process.port";

/// Set inside a Kubernetes pod.
const KUBERNETES_PORT_VAR: &str = "KUBERNETES_PORT";
const CLUSTER_IP_VAR: &str = "CLUSTER_IP";
const TOMCAT_PORT_VAR: &str = "TOMCAT_PORT";

/// Host facts that cannot be derived from configuration.
pub trait HostInfo {
    /// The host's site-local IPv4 address.
    fn site_local_ip(&self) -> String;

    /// The port the embedded web server listens on, if known.
    fn http_port(&self) -> Option<u16> {
        None
    }
}

/// [`HostInfo`] with fixed answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHost {
    /// Reported address.
    pub ip: String,
    /// Reported web-server port.
    pub http_port: Option<u16>,
}

impl Default for StaticHost {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            http_port: None,
        }
    }
}

impl HostInfo for StaticHost {
    fn site_local_ip(&self) -> String {
        self.ip.clone()
    }

    fn http_port(&self) -> Option<u16> {
        self.http_port
    }
}

/// Identity of the running process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    /// Local configuration directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Process name.
    pub name: Option<String>,
    /// Active profile.
    pub profile: Option<String>,
    /// Address other processes reach this one on.
    pub ip: Option<String>,
    /// Listening port.
    pub port: Option<String>,
    /// Numeric application id.
    pub app_id: i64,
}

impl ProcessInfo {
    /// Resolves the process identity.
    ///
    /// Inside Kubernetes (`KUBERNETES_PORT` set) the address comes from
    /// `CLUSTER_IP` and the port from `TOMCAT_PORT`. Elsewhere the address is
    /// `process.ip` and the port is `process.port`, looked up in `env` before
    /// `config`, falling back to the host's web-server port.
    pub fn resolve(config: &impl TypedAccess, env: &EnvOverrides, host: &dyn HostInfo) -> Self {
        let mut info = Self {
            app_id: config.get_long(APP_ID_KEY, 0),
            name: config.get(NAME_KEY),
            profile: config.get(PROFILE_KEY),
            ..Self::default()
        };

        if non_empty(env.get_str(KUBERNETES_PORT_VAR)).is_some() {
            info.ip = Some(
                non_empty(env.get_str(CLUSTER_IP_VAR))
                    .map_or_else(|| host.site_local_ip(), str::to_string),
            );
            info.port = env.get(TOMCAT_PORT_VAR);
        } else {
            info.ip = Some(config.get(IP_KEY).unwrap_or_else(|| host.site_local_ip()));
            info.port = env
                .get(PORT_KEY)
                .or_else(|| config.get(PORT_KEY))
                .filter(|p| !p.is_empty())
                .or_else(|| host.http_port().map(|p| p.to_string()));
        }

        tracing::info!("process.appId\t=\t{}", info.app_id);
        tracing::info!("process.name\t=\t{}", info.name.as_deref().unwrap_or_default());
        tracing::info!("process.profile\t=\t{}", info.profile.as_deref().unwrap_or_default());
        tracing::info!("process.ip\t=\t{}", info.ip.as_deref().unwrap_or_default());
        tracing::info!("process.port\t=\t{}", info.port.as_deref().unwrap_or_default());
        info
    }

    /// Sets the local configuration directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Lookup keys from most to least specific: `ip:port`, `ip`, profile,
    /// name. Empty parts are skipped.
    pub fn profile_priority(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(ip) = non_empty(self.ip.as_deref()) {
            if let Some(port) = non_empty(self.port.as_deref()) {
                keys.push(format!("{ip}:{port}"));
            }
            keys.push(ip.to_string());
        }
        if let Some(profile) = non_empty(self.profile.as_deref()) {
            keys.push(profile.to_string());
        }
        if let Some(name) = non_empty(self.name.as_deref()) {
            keys.push(name.to_string());
        }
        keys
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

//! Layered configuration content engine.
//!
//! This crate resolves application configuration from layered sources into a
//! single key-value view while keeping the raw text and a fingerprint of it:
//! - A line-oriented `key=value` text format with Java-style escapes
//! - Lazy parsing: text is only turned into a mapping on first lookup
//! - Layered configuration (defaults → file → env)
//! - Permissive typed getters that fall back to defaults
//! - 128-bit content fingerprints for change detection
//!
//! # Overview
//!
//! - [`TypedView`] - immutable mapping with typed accessors
//! - [`ContentStore`] - raw content plus lazily derived [`TypedView`]
//! - [`LayeredResolver`] - merges defaults, file content and environment
//! - [`ApplicationConfig`] - the one resolved configuration of a process
//!
//! # Example
//!
//! ```
//! use logconf_config::{LayeredResolver, TypedAccess};
//!
//! let store = LayeredResolver::new()
//!     .with_defaults([("pool.size", "4"), ("pool.name", "default")])
//!     .with_file("# tuned for prod\npool.size = 16\n")
//!     .with_env([("pool.name", "orders")])
//!     .resolve();
//!
//! assert_eq!(store.get_int("pool.size", 1), 16);
//! assert_eq!(store.get_or("pool.name", ""), "orders");
//! assert_eq!(store.content_string(), "pool.size=16\npool.name=orders\n");
//! ```
//!
//! # Text Format
//!
//! ```text
//! # comments start with '#' or '//'
//! process.name = order-service
//! banner = Welcome\tto été
//! ```
//!
//! Lines are trimmed, blank and comment lines dropped, and each remaining
//! line split at its first `=`. Lines without `=` are ignored. A value with
//! a malformed `\u` escape drops its line with a warning; nothing in this
//! crate's read path returns an error.
//!
//! # Environment Variable Overrides
//!
//! [`EnvOverrides`] reads either every variable as-is or only prefixed ones
//! using the format `PREFIX__SECTION__KEY`. For example, with prefix
//! `LOGCONF`:
//!
//! - `LOGCONF__PROCESS__NAME=orders` sets `process.name`
//! - `LOGCONF__PROCESS__APP_ID=42` sets `process.appId`

#![warn(missing_docs)]

mod application;
mod discovery;
mod env;
mod error;
mod escape;
mod fingerprint;
mod process;
mod resolver;
mod store;
mod text;
mod view;

pub use application::{
    active_profile, default_layer, ApplicationConfig, APP_ID_KEY, NAME_KEY, PROFILE_KEY,
    SPRING_PROFILE_KEY,
};
pub use discovery::{ConfigDiscovery, DiscoveredFile, AUTOCONF_DIR, CONFIG_PATH_KEY};
pub use env::EnvOverrides;
pub use error::{ConfigError, EscapeError};
pub use escape::unescape;
pub use fingerprint::Fingerprint;
pub use process::{HostInfo, ProcessInfo, StaticHost, IP_KEY, PORT_KEY};
pub use resolver::{resolve, Layer, LayeredResolver};
pub use store::ContentStore;
pub use text::{lines, parse_text, serialize, ParseReport, SkippedLine};
pub use view::{parse_bool, parse_double, parse_int, parse_long, Mapping, TypedAccess, TypedView};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_is_empty() {
        let store = ContentStore::default();
        assert!(store.get_all().is_empty());
        assert!(store.content().is_empty());
    }

    #[test]
    fn test_resolver_builder() {
        let store = LayeredResolver::new()
            .with_defaults([("a", "1")])
            .with_env([("b", "2")])
            .resolve();

        assert_eq!(store.get_int("a", 0), 1);
        assert_eq!(store.get_int("b", 0), 2);
    }
}

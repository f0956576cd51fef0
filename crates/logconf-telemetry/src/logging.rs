//! Structured logging for logconf.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and a JSON
//! or pretty fmt layer. The [`LogConfig`] can be written by hand or read from
//! resolved configuration with [`LogConfig::from_config`].
//!
//! # Configuration Keys
//!
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `logging.enabled` | `true` | install a subscriber at all |
//! | `logging.level` | `info` | `EnvFilter` directive string |
//! | `logging.format` | `json` | `json` or `pretty` |
//! | `logging.span_events` | `false` | log span open/close |
//! | `logging.file_line_info` | `false` | include file and line |
//! | `logging.thread_ids` | `false` | include thread ids |
//! | `logging.target` | `true` | include the module path |
//! | `process.name` | `unknown` | service name on the start-up event |
//!
//! # Example
//!
//! ```rust,ignore
//! use logconf_config::{ApplicationConfig, ConfigDiscovery, EnvOverrides};
//! use logconf_telemetry::{init_logging, LogConfig};
//!
//! let config = ApplicationConfig::load(&ConfigDiscovery::standard(), &EnvOverrides::from_process());
//! init_logging(&LogConfig::from_config(&config)?)?;
//!
//! tracing::info!(profile = %config.profile(), "service starting");
//! ```

use logconf_config::TypedAccess;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Configuration keys read by [`LogConfig::from_config`].
pub mod keys {
    /// Whether logging is enabled.
    pub const ENABLED: &str = "logging.enabled";
    /// Filter directives.
    pub const LEVEL: &str = "logging.level";
    /// Output format, `json` or `pretty`.
    pub const FORMAT: &str = "logging.format";
    /// Span open/close events.
    pub const SPAN_EVENTS: &str = "logging.span_events";
    /// File and line info.
    pub const FILE_LINE_INFO: &str = "logging.file_line_info";
    /// Thread ids.
    pub const THREAD_IDS: &str = "logging.thread_ids";
    /// Module path target.
    pub const TARGET: &str = "logging.target";
    /// Service name.
    pub const SERVICE_NAME: &str = "process.name";
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl LogFormat {
    /// Parses `json` or `pretty`, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` for any other value.
    pub fn parse(value: &str) -> TelemetryResult<Self> {
        if value.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if value.eq_ignore_ascii_case("pretty") {
            Ok(Self::Pretty)
        } else {
            Err(TelemetryError::InvalidConfig(format!(
                "{}={value}, expected json or pretty",
                keys::FORMAT
            )))
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "`logconf_config=debug,warn`").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name reported when logging starts.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "unknown".to_string(),
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Reads the `logging.*` keys from resolved configuration.
    ///
    /// Missing or malformed booleans keep their defaults, as every typed
    /// getter does.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` if `logging.format` or
    /// `logging.level` is set to something unusable.
    pub fn from_config(config: &impl TypedAccess) -> TelemetryResult<Self> {
        let defaults = Self::default();

        let format = match config.get(keys::FORMAT).filter(|f| !f.is_empty()) {
            Some(value) => LogFormat::parse(&value)?,
            None => defaults.format,
        };

        let level = config.get_or(keys::LEVEL, &defaults.level);
        create_env_filter(&level).map_err(|e| {
            TelemetryError::InvalidConfig(format!("{}={level}: {e}", keys::LEVEL))
        })?;

        Ok(Self {
            enabled: config.get_bool(keys::ENABLED, defaults.enabled),
            level,
            format,
            span_events: config.get_bool(keys::SPAN_EVENTS, defaults.span_events),
            file_line_info: config.get_bool(keys::FILE_LINE_INFO, defaults.file_line_info),
            thread_ids: config.get_bool(keys::THREAD_IDS, defaults.thread_ids),
            include_target: config.get_bool(keys::TARGET, defaults.include_target),
            service_name: config.get_or(keys::SERVICE_NAME, &defaults.service_name),
        })
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_thread_ids(config.thread_ids)
                .with_target(config.include_target)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(fmt_layer)
                .try_init()
                .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_thread_ids(config.thread_ids)
                .with_target(config.include_target)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(fmt_layer)
                .try_init()
                .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        }
    }

    tracing::info!(
        service.name = %config.service_name,
        level = %config.level,
        "logging initialized"
    );
    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

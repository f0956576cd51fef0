//! Structured logging for logconf services.
//!
//! Logging is configured from the same resolved configuration as the rest of
//! the process, so `logging.level` can come from defaults, the properties file
//! or an environment override alike.
//!
//! ```text
//! defaults ─┐
//! file ─────┼─▶ ApplicationConfig ─▶ LogConfig::from_config ─▶ init_logging
//! env ──────┘                                                    │
//!                                                                ▼
//!                                             registry + EnvFilter + fmt (json | pretty)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use logconf_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!("visible in development");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

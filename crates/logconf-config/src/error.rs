//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while collecting configuration inputs.
///
/// The content engine itself never fails: these errors only come from the
/// collaborators that read files or environment sources on its behalf.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration source.
    #[error("failed to read configuration source: {path}")]
    ReadError {
        /// Path to the source.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Environment source parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name (or file line).
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },
}

impl ConfigError {
    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

/// A malformed backslash escape inside a value.
///
/// Never returned to readers of a store; the line carrying it is skipped and
/// the error is reported through a warning log and [`crate::ParseReport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    /// `\u` was followed by fewer than four characters.
    #[error("truncated unicode escape at position {position}")]
    TruncatedUnicode {
        /// Character offset of the backslash.
        position: usize,
    },

    /// One of the four characters after `\u` is not a hex digit.
    #[error("invalid hex digit {found:?} in unicode escape at position {position}")]
    InvalidHexDigit {
        /// Character offset of the backslash.
        position: usize,
        /// The offending character.
        found: char,
    },
}

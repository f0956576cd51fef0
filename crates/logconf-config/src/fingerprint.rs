//! Content fingerprints for change detection.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ConfigError;

/// Domain tag mixed into every fingerprint.
const DOMAIN: &str = "logconf-content-v1";

/// 128-bit fingerprint of a store's raw content.
///
/// Derived from a domain-separated BLAKE3 hash truncated to 16 bytes. Equal
/// content always yields equal fingerprints; it is meant for detecting
/// configuration changes, not for authentication.
///
/// # Example
///
/// ```
/// use logconf_config::Fingerprint;
///
/// let a = Fingerprint::of(b"k=v\n");
/// assert_eq!(a, Fingerprint::of(b"k=v\n"));
/// assert_ne!(a, Fingerprint::of(b"k=w\n"));
/// assert_eq!(a.to_string().len(), 32);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Fingerprints `content`.
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(content);

        let mut out = [0u8; 16];
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    /// The raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 32-character hex rendering.
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let mut out = [0u8; 16];
        hex::decode_to_slice(s, &mut out)
            .map_err(|e| ConfigError::invalid_value("fingerprint", e.to_string()))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

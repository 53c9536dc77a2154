//! Per-run extension instance identifiers.

use rand::RngCore;
use serde::Serialize;

/// A randomly generated, UUID-shaped extension instance identifier.
///
/// Sixteen CSPRNG bytes rendered in the canonical 8-4-4-4-12 hyphenated
/// hex grouping. The version/variant bits are deliberately left untouched:
/// the consumer treats this as an opaque token, and a fresh one is
/// generated on every run rather than persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a fresh identifier from 128 bits of CSPRNG output.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        let hex = hex::encode(bytes);
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32],
        ))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

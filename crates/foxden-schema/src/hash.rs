//! SHA-256 digest newtype shared by the verifier and the registry client.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced when parsing a declared digest string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DigestError {
    /// The digest's algorithm tag names anything other than SHA-256.
    #[error("expected hash to be using SHA256, got '{0}'")]
    UnsupportedAlgorithm(String),

    /// The hex portion is not exactly 64 ASCII hex characters.
    #[error("invalid SHA256 digest: expected 64 hex characters in '{0}'")]
    Malformed(String),
}

/// A validated SHA-256 digest (64 lowercase hex characters).
///
/// This newtype ensures that all digests in the system are validated at
/// construction time, preventing invalid hex strings from propagating
/// through the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Create a new `Sha256Digest` from a bare hex string.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Malformed`] if `s` is not exactly 64 ASCII
    /// hex characters.
    pub fn new(s: impl Into<String>) -> Result<Self, DigestError> {
        let s = s.into();
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::Malformed(s));
        }
        Ok(Self(s.to_lowercase()))
    }

    /// Parse an algorithm-tagged digest of the form `sha256:<hex>`.
    ///
    /// The registry declares digests with an explicit algorithm tag; only
    /// SHA-256 is supported.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::UnsupportedAlgorithm`] if the tag is missing
    /// or names another algorithm, or [`DigestError::Malformed`] if the
    /// hex portion is invalid.
    pub fn parse_tagged(s: &str) -> Result<Self, DigestError> {
        let hex = s
            .strip_prefix("sha256:")
            .ok_or_else(|| DigestError::UnsupportedAlgorithm(s.to_string()))?;
        Self::new(hex)
    }

    /// Compute the SHA-256 digest of `data`.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_known_vector() {
        // SHA-256 of the empty string
        let digest = Sha256Digest::compute(b"");
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parse_tagged_accepts_sha256() {
        let hex = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let digest = Sha256Digest::parse_tagged(&format!("sha256:{hex}")).unwrap();
        assert_eq!(digest.as_str(), hex);
    }

    #[test]
    fn parse_tagged_rejects_other_algorithms() {
        let err = Sha256Digest::parse_tagged("sha512:abcdef").unwrap_err();
        assert!(matches!(err, DigestError::UnsupportedAlgorithm(_)));
        assert!(err.to_string().contains("sha512:abcdef"));

        let err = Sha256Digest::parse_tagged("deadbeef").unwrap_err();
        assert!(matches!(err, DigestError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn new_rejects_bad_lengths_and_non_hex() {
        assert!(Sha256Digest::new("abc123").is_err());
        assert!(Sha256Digest::new("z".repeat(64)).is_err());
        assert!(Sha256Digest::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn digests_normalize_to_lowercase() {
        let upper = "A".repeat(64);
        let digest = Sha256Digest::new(upper).unwrap();
        assert_eq!(digest.as_str(), "a".repeat(64));
    }
}

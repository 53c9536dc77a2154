//! Artifact integrity verification.
//!
//! A downloaded blob is only persisted after its recomputed SHA-256 digest
//! matches the one the registry declared. A mismatch is never retried: it
//! means either a corrupted transfer or a substituted artifact, and a
//! silent retry could mask the latter.

use foxden_schema::{DigestError, Sha256Digest};
use thiserror::Error;

/// A downloaded blob failed integrity verification.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// The declared digest is missing the `sha256:` tag, names another
    /// algorithm, or is not valid hex.
    #[error(transparent)]
    Digest(#[from] DigestError),

    /// The recomputed digest disagrees with the declared one.
    #[error(
        "the expected hash ({expected}) does not match the one from the \
         actual file ({actual})"
    )]
    Mismatch {
        /// Digest the registry declared.
        expected: Sha256Digest,
        /// Digest recomputed from the downloaded bytes.
        actual: Sha256Digest,
    },
}

/// Verify `bytes` against an algorithm-tagged declared digest.
///
/// # Errors
///
/// Returns [`IntegrityError::Digest`] if `declared` is not a well-formed
/// `sha256:`-tagged digest, or [`IntegrityError::Mismatch`] naming both
/// digests if the content does not match.
pub fn verify(declared: &str, bytes: &[u8]) -> Result<(), IntegrityError> {
    let expected = Sha256Digest::parse_tagged(declared)?;
    let actual = Sha256Digest::compute(bytes);

    if actual != expected {
        return Err(IntegrityError::Mismatch { expected, actual });
    }
    Ok(())
}

//! Shared types and wire formats for foxden.
//!
//! This crate defines the data shapes that cross module boundaries: the
//! tagged SHA-256 digest used for artifact verification, the mozlz4
//! container codec, the search configuration descriptor, and per-run
//! instance identifiers.

pub mod hash;
pub mod ids;
pub mod mozlz4;
pub mod search;

// Re-exports
pub use hash::{DigestError, Sha256Digest};
pub use ids::InstanceId;
pub use search::{EngineMetaData, SearchConfig, SearchEngine, SearchMetaData};

/// Magic bytes opening a mozlz4 container: the ASCII tag `mozLz40` plus a
/// terminating NUL.
pub const MOZLZ4_MAGIC: [u8; 8] = *b"mozLz40\0";

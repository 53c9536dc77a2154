//! Search configuration descriptor.
//!
//! The consuming browser reads `search.json.mozlz4` with an exact field
//! layout: underscore-prefixed engine fields and a camelCase metadata
//! block. The serde renames below are part of the wire contract, not
//! style.

use serde::{Deserialize, Serialize};

/// Format version the consuming application expects.
const FORMAT_VERSION: u32 = 6;

/// The full search configuration descriptor wrapped by the mozlz4
/// container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Descriptor format version, pinned to 6.
    pub version: u32,
    /// Engine entries in declaration order.
    pub engines: Vec<SearchEngine>,
    /// Default-engine selections.
    #[serde(rename = "metaData")]
    pub meta_data: SearchMetaData,
}

/// One search engine entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Engine display name.
    #[serde(rename = "_name")]
    pub name: String,
    /// Whether the engine ships with the application.
    #[serde(rename = "_isAppProvided")]
    pub is_app_provided: bool,
    /// Per-engine ordering metadata.
    #[serde(rename = "_metaData")]
    pub meta_data: EngineMetaData,
}

/// Ordering metadata attached to each engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMetaData {
    /// 1-based position in the engine list.
    pub order: u32,
}

/// Descriptor-level metadata naming the default engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetaData {
    /// Keep the declared engine order instead of the frecency-based one.
    #[serde(rename = "useSavedOrder")]
    pub use_saved_order: bool,
    /// Default engine for normal windows.
    pub current: String,
    /// Default engine for private windows.
    pub private: String,
}

impl SearchConfig {
    /// Build a descriptor from an ordered engine list and the two default
    /// selections. Engine order is stable and drives the 1-based `order`
    /// indices.
    pub fn new(
        engines: impl IntoIterator<Item = impl Into<String>>,
        default: impl Into<String>,
        default_private: impl Into<String>,
    ) -> Self {
        let engines = engines
            .into_iter()
            .enumerate()
            .map(|(i, name)| SearchEngine {
                name: name.into(),
                is_app_provided: true,
                meta_data: EngineMetaData {
                    order: i as u32 + 1,
                },
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            engines,
            meta_data: SearchMetaData {
                use_saved_order: true,
                current: default.into(),
                private: default_private.into(),
            },
        }
    }
}

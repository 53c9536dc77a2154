//! Build manifest parsing.
//!
//! A `foxden.toml` manifest declares which addons to fetch, the search
//! engine lineup, the license policy, and style template variables. Every
//! section has defaults, so a missing manifest (or any missing section)
//! still yields a complete, runnable configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::amo;
use crate::license::LicensePolicy;
use crate::style::StyleValue;

/// Top-level build manifest parsed from a `foxden.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Manifest {
    /// Output tree settings.
    pub profile: ProfileSection,
    /// Addons to fetch from the registry.
    pub addons: AddonsSection,
    /// Search engine lineup and defaults.
    pub search: SearchSection,
    /// License gate policy.
    pub licenses: LicensePolicy,
    /// Style templating settings.
    pub style: StyleSection,
}

/// The `[profile]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProfileSection {
    /// Directory the assembled profile is written to.
    pub output: PathBuf,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("profile"),
        }
    }
}

/// The `[addons]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AddonsSection {
    /// Registry base URL.
    pub registry: String,
    /// Slugs to fetch, in no particular order.
    pub slugs: Vec<String>,
}

impl Default for AddonsSection {
    fn default() -> Self {
        Self {
            registry: amo::DEFAULT_REGISTRY.to_string(),
            slugs: [
                "ublock-origin",
                "i-dont-care-about-cookies",
                "sponsorblock",
                "clearurls",
                "universal-bypass",
                "multi-account-containers",
                "temporary-containers",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// The `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchSection {
    /// Engine names in display order.
    pub engines: Vec<String>,
    /// Default engine for normal windows.
    pub default: String,
    /// Default engine for private windows.
    pub default_private: String,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            engines: ["Google", "Bing", "DuckDuckGo", "Wikipedia (en)"]
                .map(String::from)
                .to_vec(),
            default: "Google".to_string(),
            default_private: "DuckDuckGo".to_string(),
        }
    }
}

/// The `[style]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StyleSection {
    /// Variables injected into every style template, alongside the
    /// build-generated ones.
    pub variables: BTreeMap<String, StyleValue>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            variables: [("addons-change-ui".to_string(), StyleValue::Bool(true))]
                .into_iter()
                .collect(),
        }
    }
}

impl Manifest {
    /// Load a manifest from the given path, falling back to the built-in
    /// defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no manifest file, using defaults");
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let manifest: Manifest = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(manifest)
    }
}

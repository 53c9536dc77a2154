//! License gate applied before any package body is fetched.
//!
//! The policy is configuration data (a `[licenses]` manifest table), not a
//! hardcoded constant: the registry's numeric license ids are not a stable
//! public contract and may drift.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A package failed the license gate. Fatal for the whole run.
#[derive(Error, Debug)]
#[error(
    "tried to download the '{slug}' addon marked with a non open source/unknown \
     license '{license}' ({url})"
)]
pub struct PolicyError {
    /// Registry slug of the rejected package.
    pub slug: String,
    /// Declared license name.
    pub license: String,
    /// Reference URL for the license text.
    pub url: String,
}

/// Allow-list policy over registry license metadata.
///
/// A package passes if its numeric license id is allow-listed, or if a
/// configured exception matches its slug and license name exactly (the
/// registry has no stable numeric id for some licenses).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LicensePolicy {
    /// Registry license ids accepted without further inspection.
    pub allowed_ids: Vec<i64>,
    /// Per-slug exceptions matched by license name.
    pub exceptions: Vec<LicenseException>,
}

/// One slug-specific license exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseException {
    /// Package slug the exception applies to.
    pub slug: String,
    /// License name that must match textually.
    pub name: String,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            allowed_ids: vec![
                6,    // GPL-3.0
                12,   // LGPL-3.0
                22,   // MIT
                3338, // MPL-2.0
            ],
            exceptions: vec![LicenseException {
                slug: "universal-bypass".to_string(),
                name: "Unlicense".to_string(),
            }],
        }
    }
}

impl LicensePolicy {
    /// Whether a package with this license metadata may be fetched.
    pub fn permits(&self, id: Option<i64>, name: &str, slug: &str) -> bool {
        id.is_some_and(|id| self.allowed_ids.contains(&id))
            || self
                .exceptions
                .iter()
                .any(|e| e.slug == slug && e.name == name)
    }

    /// Apply the gate, producing a descriptive [`PolicyError`] on
    /// rejection.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] naming the slug, license name, and license
    /// reference URL if [`Self::permits`] is false.
    pub fn check(
        &self,
        id: Option<i64>,
        name: &str,
        slug: &str,
        url: Option<&str>,
    ) -> Result<(), PolicyError> {
        if self.permits(id, name, slug) {
            Ok(())
        } else {
            Err(PolicyError {
                slug: slug.to_string(),
                license: name.to_string(),
                url: url.unwrap_or("no license url").to_string(),
            })
        }
    }
}

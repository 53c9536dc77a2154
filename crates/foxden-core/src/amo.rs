//! Registry client for addons.mozilla.org.
//!
//! Fetches per-addon metadata from the v5 API. Only the fields the
//! pipeline consumes are modeled: the registry-assigned guid and the
//! current version's license and primary distribution file.

use std::collections::HashMap;

use serde::Deserialize;

/// Production registry base URL.
pub const DEFAULT_REGISTRY: &str = "https://addons.mozilla.org";

/// Locale requested from the registry.
const LOCALE: &str = "en-US";

/// Registry metadata for one addon, as returned by
/// `GET /api/v5/addons/addon/{slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonMetadata {
    /// Stable registry-assigned extension identifier.
    pub guid: String,
    /// The version the registry currently serves.
    pub current_version: AddonVersion,
}

/// The `current_version` block of the registry response.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonVersion {
    /// Declared license of this version.
    pub license: AddonLicense,
    /// Distribution files; the first entry is the primary artifact.
    #[serde(default)]
    pub files: Vec<AddonFile>,
}

/// License metadata attached to an addon version.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonLicense {
    /// Registry-assigned numeric license id. Absent for custom licenses.
    pub id: Option<i64>,
    /// Human-readable license name, possibly localized.
    pub name: LocalizedText,
    /// Reference URL for the license text.
    pub url: Option<String>,
}

/// One distribution file of an addon version.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonFile {
    /// Download URL for the raw package bytes.
    pub url: String,
    /// Declared digest, algorithm-tagged (`sha256:<hex>`).
    pub hash: String,
}

/// A registry text field that is either a plain string or a locale map.
///
/// The v5 API serves license names as `{"en-US": "...", ...}` objects;
/// older payloads and some fields are plain strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// Unlocalized plain string.
    Plain(String),
    /// Locale tag to translation map; entries may be null.
    Localized(HashMap<String, Option<String>>),
}

impl LocalizedText {
    /// Resolve the text, preferring the requested locale and falling back
    /// to any available translation.
    pub fn preferred(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Localized(map) => map
                .get(LOCALE)
                .and_then(Option::as_deref)
                .or_else(|| map.values().flatten().map(String::as_str).next())
                .unwrap_or(""),
        }
    }
}

/// Fetch registry metadata for `slug`.
///
/// # Errors
///
/// Returns the underlying [`reqwest::Error`] if the request fails, the
/// registry answers with an error status, or the payload does not
/// deserialize into the expected shape.
pub async fn fetch_metadata(
    client: &reqwest::Client,
    base_url: &str,
    slug: &str,
) -> Result<AddonMetadata, reqwest::Error> {
    let url = format!(
        "{}/api/v5/addons/addon/{slug}",
        base_url.trim_end_matches('/')
    );

    tracing::debug!(slug, "fetching registry metadata");

    client
        .get(&url)
        .query(&[("lang", LOCALE)])
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

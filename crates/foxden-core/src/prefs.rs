//! Preference compilation.
//!
//! Build-time values and `prefs/*.json` override files merge into one
//! flat preference set, serialized as a `prefs.js` preference script.
//! Entries can be tagged internal; internal entries are annotations for
//! the build itself and never reach the emitted script.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Reserved prefix marking override-file keys as internal annotations.
const INTERNAL_PREFIX: char = '_';

#[derive(Debug, Clone)]
struct PrefEntry {
    value: Value,
    internal: bool,
}

/// An ordered preference set with merge-and-override semantics.
///
/// Later insertions overwrite earlier ones key-for-key. Emission order is
/// sorted by key so repeated builds produce identical output.
#[derive(Debug, Clone, Default)]
pub struct PrefSet {
    entries: BTreeMap<String, PrefEntry>,
}

impl PrefSet {
    /// Create an empty preference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a preference that will be emitted to `prefs.js`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key.into(), value.into(), false);
    }

    /// Set an internal annotation: merged and overridable like any other
    /// entry, but excluded from the emitted script.
    pub fn set_internal(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key.into(), value.into(), true);
    }

    fn insert(&mut self, key: String, value: Value, internal: bool) {
        self.entries.insert(key, PrefEntry { value, internal });
    }

    /// Look up the current value for `key`, internal or not.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Merge every `*.json` file under `dir` in ascending filename order,
    /// later files overwriting earlier ones key-for-key. Keys carrying the
    /// reserved prefix are tagged internal at this boundary. A missing
    /// directory means no overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, is not valid JSON, or
    /// its top level is not an object.
    pub async fn load_overrides(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("failed to list {}", dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                names.push(path);
            }
        }
        names.sort();

        for path in names {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let overrides: Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let overrides = overrides
                .as_object()
                .with_context(|| format!("{} is not a JSON object", path.display()))?;

            tracing::debug!(file = %path.display(), keys = overrides.len(), "merging preference overrides");
            for (key, value) in overrides {
                let internal = key.starts_with(INTERNAL_PREFIX);
                self.insert(key.clone(), value.clone(), internal);
            }
        }
        Ok(())
    }

    /// Serialize the non-internal entries as a preference script, one
    /// `user_pref("<key>", <value>);` statement per line.
    ///
    /// Structured values are JSON-encoded to text and embedded as a string
    /// scalar, which is how the consuming application expects nested data.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be JSON-encoded.
    pub fn to_user_js(&self) -> Result<String, serde_json::Error> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for (key, entry) in &self.entries {
            if entry.internal {
                continue;
            }
            let rendered = match &entry.value {
                Value::Object(_) | Value::Array(_) => {
                    serde_json::to_string(&serde_json::to_string(&entry.value)?)?
                }
                scalar => serde_json::to_string(scalar)?,
            };
            lines.push(format!(
                "user_pref({}, {rendered});",
                serde_json::to_string(key)?
            ));
        }
        Ok(lines.join("\n"))
    }
}

//! Output profile tree layout.

use std::path::{Path, PathBuf};

/// Extension packages directory: `<root>/extensions`
pub fn extensions_dir(root: &Path) -> PathBuf {
    root.join("extensions")
}

/// Compiled stylesheet directory: `<root>/chrome`
pub fn chrome_dir(root: &Path) -> PathBuf {
    root.join("chrome")
}

/// Preference script path: `<root>/prefs.js`
pub fn prefs_path(root: &Path) -> PathBuf {
    root.join("prefs.js")
}

/// Search configuration blob path: `<root>/search.json.mozlz4`
pub fn search_config_path(root: &Path) -> PathBuf {
    root.join("search.json.mozlz4")
}

/// Write a profile artifact, creating its parent directory first.
///
/// # Errors
///
/// Returns an I/O error if directory creation or the write fails.
pub async fn write_profile_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

//! Style templating.
//!
//! Each `style/<name>/index.scss` template is compiled to
//! `chrome/user<CapitalizedName>.css` with build-time variables injected
//! ahead of the source body as SCSS declarations. Nested variable maps
//! render to SCSS map literals so templates can iterate over them.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from template discovery or compilation.
#[derive(Error, Debug)]
pub enum StyleError {
    /// Template tree could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The SCSS compiler rejected the template.
    #[error("sass compilation failed for '{name}': {message}")]
    Compile {
        /// Template name.
        name: String,
        /// Compiler diagnostic.
        message: String,
    },
}

/// A build-time variable injected into style templates.
///
/// Deserializes untagged from the manifest's `[style.variables]` table, so
/// TOML booleans, integers, strings, and tables map straight onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Feature flag.
    Bool(bool),
    /// Numeric constant.
    Int(i64),
    /// String constant, rendered JSON-quoted.
    Str(String),
    /// Nested mapping, rendered as an SCSS map literal.
    Map(BTreeMap<String, StyleValue>),
}

impl StyleValue {
    fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Str(s) => quote(s),
            Self::Map(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}: {}", quote(key), value.render()))
                    .collect();
                format!("({})", entries.join(", "))
            }
        }
    }
}

/// JSON-style string quoting for SCSS literals.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render the variable context to SCSS declarations, one `$name: value;`
/// line per variable.
pub fn render_variables(vars: &BTreeMap<String, StyleValue>) -> String {
    let mut out = String::new();
    for (name, value) in vars {
        let _ = writeln!(out, "${name}: {};", value.render());
    }
    out
}

/// Output file name for a template: `user<CapitalizedName>.css`.
pub fn css_file_name(name: &str) -> String {
    let mut chars = name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("user{capitalized}.css")
}

/// List the template names under `style_root`: every subdirectory with an
/// `index.scss` entry point, in sorted order. A missing root means no
/// templates.
///
/// # Errors
///
/// Returns an error if the directory listing fails.
pub async fn discover_templates(style_root: &Path) -> Result<Vec<String>, StyleError> {
    if !style_root.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(style_root).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.join("index.scss").exists() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Compile one template with the given variable context injected ahead of
/// the source body. The template directory is on the compiler load path,
/// so templates can `@use` or `@import` siblings.
///
/// # Errors
///
/// Returns [`StyleError::Io`] if the entry point cannot be read, or
/// [`StyleError::Compile`] if the SCSS compiler rejects the input.
pub async fn compile_template(
    name: &str,
    style_root: &Path,
    vars: &BTreeMap<String, StyleValue>,
) -> Result<String, StyleError> {
    let dir = style_root.join(name);
    let source = tokio::fs::read_to_string(dir.join("index.scss")).await?;
    let input = format!("{}{source}", render_variables(vars));

    let options = grass::Options::default().load_path(&dir);
    grass::from_string(input, &options).map_err(|e| StyleError::Compile {
        name: name.to_string(),
        message: e.to_string(),
    })
}

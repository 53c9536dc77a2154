//! Run orchestration: sequences the fetch pipeline, identifier
//! assignment, and artifact emission into one profile build.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use foxden_schema::{InstanceId, SearchConfig, mozlz4};

use crate::config::Manifest;
use crate::prefs::PrefSet;
use crate::style::StyleValue;
use crate::{fetch, profile, style};

/// Assemble a complete profile under `output_root`.
///
/// `input_root` is where `prefs/` overrides and `style/` templates are
/// discovered. Stages:
///
/// 1. Emit the search configuration blob and seed the preference set.
/// 2. Fetch, gate, verify, and persist every addon concurrently.
/// 3. Assign one fresh instance identifier per addon. This is the join
///    point: preferences and style templates both consume the identifier
///    maps, so neither is compiled before every fetch has finished.
/// 4. Compile preferences and style templates into the output tree.
///
/// # Errors
///
/// The first failure anywhere aborts the build; artifacts already written
/// are left in place and a re-run overwrites them.
pub async fn build_profile(
    manifest: &Manifest,
    input_root: &Path,
    output_root: &Path,
) -> Result<()> {
    let search = &manifest.search;
    tracing::info!(
        addons = manifest.addons.slugs.len(),
        engines = search.engines.len(),
        output = %output_root.display(),
        "assembling profile"
    );

    // Search configuration artifact.
    let descriptor = SearchConfig::new(&search.engines, &search.default, &search.default_private);
    let payload =
        serde_json::to_vec(&descriptor).context("failed to serialize search configuration")?;
    let blob = mozlz4::encode(&payload).context("failed to encode search.json.mozlz4")?;
    profile::write_profile_file(&profile::search_config_path(output_root), &blob)
        .await
        .context("failed to write search.json.mozlz4")?;

    let mut prefs = PrefSet::new();
    prefs.set("browser.urlbar.placeholderName", search.default.clone());
    prefs.set(
        "browser.urlbar.placeholderName.private",
        search.default_private.clone(),
    );

    // Fetch pipeline, all slugs concurrently.
    let client = reqwest::Client::new();
    let fetched = fetch::fetch_addons(
        &client,
        &manifest.addons.registry,
        &manifest.addons.slugs,
        &manifest.licenses,
        &profile::extensions_dir(output_root),
    )
    .await?;

    // Instance identifiers: one per verified addon, fresh every run.
    let mut uuids = serde_json::Map::new();
    let mut addon_ids = BTreeMap::new();
    for addon in &fetched {
        let id = InstanceId::generate();
        uuids.insert(
            addon.guid.clone(),
            serde_json::Value::String(id.as_str().to_string()),
        );
        addon_ids.insert(addon.slug.clone(), StyleValue::Str(id.as_str().to_string()));
    }
    prefs.set(
        "extensions.webextensions.uuids",
        serde_json::Value::Object(uuids),
    );

    // Preference script.
    prefs
        .load_overrides(&input_root.join("prefs"))
        .await
        .context("failed to merge preference overrides")?;
    let user_js = prefs.to_user_js().context("failed to serialize prefs.js")?;
    profile::write_profile_file(&profile::prefs_path(output_root), user_js.as_bytes())
        .await
        .context("failed to write prefs.js")?;

    // Style templates, compiled and written concurrently.
    let mut vars = manifest.style.variables.clone();
    vars.insert("addon-ids".to_string(), StyleValue::Map(addon_ids));

    let style_root = input_root.join("style");
    let templates = style::discover_templates(&style_root).await?;
    futures::future::try_join_all(templates.iter().map(|name| {
        let vars = &vars;
        let style_root = &style_root;
        async move {
            let css = style::compile_template(name, style_root, vars).await?;
            let dest = profile::chrome_dir(output_root).join(style::css_file_name(name));
            profile::write_profile_file(&dest, css.as_bytes())
                .await
                .map_err(style::StyleError::Io)?;
            tracing::info!(template = %name, "compiled style template");
            Ok::<(), style::StyleError>(())
        }
    }))
    .await?;

    tracing::info!(addons = fetched.len(), "profile assembled");
    Ok(())
}

//! Extension fetch pipeline.
//!
//! Per slug the stages are strictly ordered: registry metadata, license
//! gate, body fetch, digest verification, persistence. Across slugs the
//! pipelines run concurrently and complete in arbitrary order; the first
//! failure aborts the whole run.

use std::path::Path;

use thiserror::Error;
use tokio::task::JoinSet;

use crate::amo;
use crate::license::{LicensePolicy, PolicyError};
use crate::verify::{self, IntegrityError};

/// Errors from the fetch pipeline. All of them abort the run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Registry or file-host request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing the verified package to the output tree failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The package's license is not on the allow-list.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The downloaded bytes failed digest verification.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// The registry payload is missing a field the pipeline needs.
    #[error("registry metadata for '{slug}': {message}")]
    Metadata {
        /// Slug whose metadata was unusable.
        slug: String,
        /// What was missing or malformed.
        message: String,
    },

    /// A concurrent fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A package that made it through the full pipeline.
#[derive(Debug, Clone)]
pub struct FetchedAddon {
    /// Registry slug the package was requested under.
    pub slug: String,
    /// Stable registry-assigned extension identifier.
    pub guid: String,
}

/// Run the full pipeline for one slug.
///
/// On success the verified bytes are persisted to
/// `<extensions_dir>/<guid>.xpi` and the slug/guid pair is returned.
///
/// # Errors
///
/// Any stage failure is returned as a [`FetchError`]; nothing written so
/// far is cleaned up.
pub async fn fetch_addon(
    client: &reqwest::Client,
    base_url: &str,
    slug: &str,
    policy: &LicensePolicy,
    extensions_dir: &Path,
) -> Result<FetchedAddon, FetchError> {
    let meta = amo::fetch_metadata(client, base_url, slug).await?;
    let license = &meta.current_version.license;

    // Gate before the body is ever requested.
    policy.check(
        license.id,
        license.name.preferred(),
        slug,
        license.url.as_deref(),
    )?;

    let file = meta
        .current_version
        .files
        .first()
        .ok_or_else(|| FetchError::Metadata {
            slug: slug.to_string(),
            message: "current version has no distribution files".to_string(),
        })?;

    tracing::debug!(slug, url = %file.url, "downloading addon package");
    let bytes = client
        .get(&file.url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    verify::verify(&file.hash, &bytes)?;

    let dest = extensions_dir.join(format!("{}.xpi", meta.guid));
    tokio::fs::write(&dest, &bytes).await?;
    tracing::info!(slug, guid = %meta.guid, size = bytes.len(), "addon verified and persisted");

    Ok(FetchedAddon {
        slug: slug.to_string(),
        guid: meta.guid,
    })
}

/// Fetch every requested slug concurrently.
///
/// Results arrive in completion order, not request order. The first
/// failing pipeline fails the whole call; dropping the task set cancels
/// the fetches still in flight, and files already persisted are left in
/// place (re-running the build overwrites them).
///
/// # Errors
///
/// Propagates the first [`FetchError`] from any slug's pipeline.
pub async fn fetch_addons(
    client: &reqwest::Client,
    base_url: &str,
    slugs: &[String],
    policy: &LicensePolicy,
    extensions_dir: &Path,
) -> Result<Vec<FetchedAddon>, FetchError> {
    let mut set: JoinSet<Result<FetchedAddon, FetchError>> = JoinSet::new();

    for slug in slugs {
        let client = client.clone();
        let base_url = base_url.to_string();
        let slug = slug.clone();
        let policy = policy.clone();
        let extensions_dir = extensions_dir.to_path_buf();

        set.spawn(async move {
            fetch_addon(&client, &base_url, &slug, &policy, &extensions_dir).await
        });
    }

    let mut fetched = Vec::with_capacity(slugs.len());
    while let Some(res) = set.join_next().await {
        fetched.push(res??);
    }
    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foxden_schema::Sha256Digest;
    use mockito::{Matcher, Server};

    const XPI_BODY: &[u8] = b"fake xpi archive bytes";

    fn metadata_body(server_url: &str, license_id: i64, license_name: &str, hash: &str) -> String {
        format!(
            r#"{{
                "guid": "test-addon@example.org",
                "current_version": {{
                    "license": {{
                        "id": {license_id},
                        "name": {{"en-US": "{license_name}"}},
                        "url": "https://example.org/license"
                    }},
                    "files": [{{
                        "url": "{server_url}/files/addon.xpi",
                        "hash": "{hash}"
                    }}]
                }}
            }}"#
        )
    }

    #[tokio::test]
    async fn pipeline_persists_verified_addon() {
        let mut server = Server::new_async().await;
        let hash = format!("sha256:{}", Sha256Digest::compute(XPI_BODY));

        let _meta = server
            .mock("GET", "/api/v5/addons/addon/test-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_header("content-type", "application/json")
            .with_body(metadata_body(&server.url(), 22, "MIT License", &hash))
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/files/addon.xpi")
            .with_body(XPI_BODY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let addon = fetch_addon(
            &client,
            &server.url(),
            "test-addon",
            &LicensePolicy::default(),
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(addon.slug, "test-addon");
        assert_eq!(addon.guid, "test-addon@example.org");
        let written = std::fs::read(dir.path().join("test-addon@example.org.xpi")).unwrap();
        assert_eq!(written, XPI_BODY);
    }

    #[tokio::test]
    async fn rejected_license_stops_before_body_fetch() {
        let mut server = Server::new_async().await;
        let hash = format!("sha256:{}", Sha256Digest::compute(XPI_BODY));

        let _meta = server
            .mock("GET", "/api/v5/addons/addon/test-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_header("content-type", "application/json")
            .with_body(metadata_body(&server.url(), 9999, "Custom", &hash))
            .create_async()
            .await;
        // The body endpoint must never be hit.
        let file = server
            .mock("GET", "/files/addon.xpi")
            .with_body(XPI_BODY)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let err = fetch_addon(
            &client,
            &server.url(),
            "test-addon",
            &LicensePolicy::default(),
            dir.path(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::Policy(_)));
        assert!(err.to_string().contains("test-addon"));
        assert!(err.to_string().contains("Custom"));
        file.assert_async().await;
    }

    #[tokio::test]
    async fn digest_mismatch_fails_and_persists_nothing() {
        let mut server = Server::new_async().await;
        let wrong_hash = format!("sha256:{}", "a".repeat(64));

        let _meta = server
            .mock("GET", "/api/v5/addons/addon/test-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_header("content-type", "application/json")
            .with_body(metadata_body(&server.url(), 22, "MIT License", &wrong_hash))
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/files/addon.xpi")
            .with_body(XPI_BODY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let err = fetch_addon(
            &client,
            &server.url(),
            "test-addon",
            &LicensePolicy::default(),
            dir.path(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::Integrity(_)));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn missing_files_entry_is_a_metadata_error() {
        let mut server = Server::new_async().await;

        let _meta = server
            .mock("GET", "/api/v5/addons/addon/test-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "guid": "test-addon@example.org",
                    "current_version": {
                        "license": {"id": 22, "name": "MIT License", "url": null},
                        "files": []
                    }
                }"#,
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let err = fetch_addon(
            &client,
            &server.url(),
            "test-addon",
            &LicensePolicy::default(),
            dir.path(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::Metadata { .. }));
    }

    #[tokio::test]
    async fn fetch_addons_fails_fast_on_any_slug() {
        let mut server = Server::new_async().await;
        let hash = format!("sha256:{}", Sha256Digest::compute(XPI_BODY));

        let _good = server
            .mock("GET", "/api/v5/addons/addon/good-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_header("content-type", "application/json")
            .with_body(metadata_body(&server.url(), 22, "MIT License", &hash))
            .create_async()
            .await;
        let _bad = server
            .mock("GET", "/api/v5/addons/addon/bad-addon")
            .match_query(Matcher::UrlEncoded("lang".into(), "en-US".into()))
            .with_status(500)
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/files/addon.xpi")
            .with_body(XPI_BODY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let result = fetch_addons(
            &client,
            &server.url(),
            &["good-addon".to_string(), "bad-addon".to_string()],
            &LicensePolicy::default(),
            dir.path(),
        )
        .await;

        assert!(result.is_err());
    }
}

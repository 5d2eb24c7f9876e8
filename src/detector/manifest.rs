use super::{Detector, ScanContext};
use crate::error::{Result, ScanError};
use crate::model::{PackageIdentifier, Source};
use crate::project::MANIFEST_FILE;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct ManifestDetector;

#[derive(Deserialize)]
struct Manifest {
    dependencies: Option<HashMap<String, String>>,
    #[serde(rename = "devDependencies")]
    dev_dependencies: Option<HashMap<String, String>>,
}

/// Checks the declared dependencies in `package.json`.
///
/// Runtime and development groups are both consulted. A declared range
/// matches when, with everything but digits and dots stripped, it starts
/// with the identifier's version, so `^1.0.3` matches `1.0`.
///
/// # Errors
///
/// [`ScanError::ManifestNotFound`] if `package.json` is missing.
pub fn check_manifest(root: &Path, id: &PackageIdentifier) -> Result<bool> {
    let path = root.join(MANIFEST_FILE);
    if !path.exists() {
        return Err(ScanError::ManifestNotFound(path));
    }

    let content = fs::read_to_string(&path)?;
    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|source| ScanError::Parse {
            path: path.clone(),
            source,
        })?;

    let found = [manifest.dependencies, manifest.dev_dependencies]
        .iter()
        .flatten()
        .filter_map(|deps| deps.get(id.name()))
        .any(|declared| declared_matches(declared, id.version()));

    Ok(found)
}

fn declared_matches(declared: &str, version: &str) -> bool {
    let stripped: String = declared
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    stripped.starts_with(version)
}

#[async_trait]
impl Detector for ManifestDetector {
    fn source(&self) -> Source {
        Source::Manifest
    }

    async fn detect(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<bool> {
        let found = check_manifest(&ctx.root, id)?;
        debug!(identifier = %id, found, "checked package.json");
        Ok(found)
    }
}

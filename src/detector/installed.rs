use super::{Detector, ScanContext};
use crate::error::Result;
use crate::model::{PackageIdentifier, Source};
use crate::project::{INSTALL_DIR, MANIFEST_FILE};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct InstalledDetector;

#[derive(Deserialize)]
struct InstalledManifest {
    version: Option<String>,
}

/// Path to the installed copy's `package.json`.
///
/// Scoped names nest one directory per segment:
/// `@scope/name` -> `node_modules/@scope/name/package.json`.
pub fn installed_manifest_path(root: &Path, name: &str) -> PathBuf {
    name.split('/')
        .fold(root.join(INSTALL_DIR), |path, segment| path.join(segment))
        .join(MANIFEST_FILE)
}

/// Checks the version actually installed under `node_modules`.
///
/// Only an exact version match counts.
pub fn check_installed(root: &Path, id: &PackageIdentifier) -> bool {
    let path = installed_manifest_path(root, id.name());
    if !path.exists() {
        return false;
    }

    let manifest: InstalledManifest = match fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(m) => m,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "unreadable installed package.json, treating as not found"
            );
            return false;
        }
    };

    manifest.version.as_deref() == Some(id.version())
}

#[async_trait]
impl Detector for InstalledDetector {
    fn source(&self) -> Source {
        Source::InstalledTree
    }

    async fn detect(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<bool> {
        let found = check_installed(&ctx.root, id);
        debug!(identifier = %id, found, "checked node_modules");
        Ok(found)
    }
}

//! Evidence detectors.
//!
//! Each detector answers one question for one identifier: does this source
//! reference that exact release?
//!
//! | Detector | Source | Match rule |
//! |----------|--------|------------|
//! | [`ManifestDetector`] | `package.json` dependencies | version prefix, range chars ignored |
//! | [`LockfileDetector`] | `package-lock.json` / `yarn.lock` | substring |
//! | [`InstalledDetector`] | `node_modules/<name>/package.json` | exact version |
//! | [`DependencyTreeDetector`] | `npm ls` / `yarn list` / `yarn info` | substring |
//!
//! Missing evidence is a "not found" verdict. The only fatal condition is a
//! missing or malformed project manifest.

mod installed;
mod lockfile;
mod manifest;
mod tree;

pub use installed::{check_installed, InstalledDetector};
pub use lockfile::{check_lockfile, LockfileDetector};
pub use manifest::{check_manifest, ManifestDetector};
pub use tree::{check_dependency_tree, DependencyTreeDetector, DEFAULT_TIMEOUT};

use crate::command::CommandRunner;
use crate::error::Result;
use crate::model::{PackageIdentifier, Source};
use crate::project::PackageManagerKind;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Facts about the project computed once per run.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub root: PathBuf,
    pub kind: PackageManagerKind,
}

impl ScanContext {
    pub fn new(root: impl Into<PathBuf>, kind: PackageManagerKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    /// Builds a context for `root`, detecting the package manager from disk.
    pub fn detect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let kind = PackageManagerKind::detect(&root);
        Self { root, kind }
    }
}

/// Checks one source of evidence for a single identifier.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Returns the source this detector inspects.
    fn source(&self) -> Source;

    /// Returns true if the source references the identifier.
    ///
    /// # Errors
    ///
    /// Only structural problems with the project are errors. Absent evidence
    /// is `Ok(false)`.
    async fn detect(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<bool>;
}

/// Returns the four detectors in check-cost order.
pub fn default_detectors(
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(ManifestDetector),
        Box::new(LockfileDetector),
        Box::new(InstalledDetector),
        Box::new(DependencyTreeDetector::new(runner, timeout)),
    ]
}

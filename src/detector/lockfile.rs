use super::{Detector, ScanContext};
use crate::error::Result;
use crate::model::{PackageIdentifier, Source};
use crate::project::PackageManagerKind;
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub struct LockfileDetector;

/// Searches the lockfile text for the identifier.
///
/// Matches either `"name": "version"` (npm) or `name@version` (yarn). The
/// file is not parsed, so an unrelated string that happens to contain one of
/// those shapes also counts.
pub fn check_lockfile(root: &Path, id: &PackageIdentifier, kind: PackageManagerKind) -> bool {
    let path = root.join(kind.lockfile_name());
    if !path.exists() {
        return false;
    }

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "could not read lock file, treating as not found"
            );
            return false;
        }
    };

    let quoted = format!("\"{}\": \"{}\"", id.name(), id.version());
    content.contains(&quoted) || content.contains(id.as_str())
}

#[async_trait]
impl Detector for LockfileDetector {
    fn source(&self) -> Source {
        Source::Lockfile
    }

    async fn detect(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<bool> {
        let found = check_lockfile(&ctx.root, id, ctx.kind);
        debug!(identifier = %id, lockfile = ctx.kind.lockfile_name(), found, "checked lock file");
        Ok(found)
    }
}

use super::PackageIdentifier;
use crate::project::PackageManagerKind;
use serde::Serialize;

/// One of the four places evidence of a package can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    Manifest,
    Lockfile,
    InstalledTree,
    DependencyTree,
}

impl Source {
    /// All sources, in check-cost order.
    pub const ALL: [Source; 4] = [
        Source::Manifest,
        Source::Lockfile,
        Source::InstalledTree,
        Source::DependencyTree,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Manifest => "package.json",
            Source::Lockfile => "lock file",
            Source::InstalledTree => "node_modules",
            Source::DependencyTree => "dependency tree",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub identifier: PackageIdentifier,
    pub found_in_manifest: bool,
    pub found_in_lockfile: bool,
    pub found_in_installed_tree: bool,
    pub found_in_dependency_tree: bool,
}

impl ScanRecord {
    pub fn new(identifier: PackageIdentifier) -> Self {
        Self {
            identifier,
            found_in_manifest: false,
            found_in_lockfile: false,
            found_in_installed_tree: false,
            found_in_dependency_tree: false,
        }
    }

    pub fn set(&mut self, source: Source, found: bool) {
        match source {
            Source::Manifest => self.found_in_manifest = found,
            Source::Lockfile => self.found_in_lockfile = found,
            Source::InstalledTree => self.found_in_installed_tree = found,
            Source::DependencyTree => self.found_in_dependency_tree = found,
        }
    }

    pub fn found_in(&self, source: Source) -> bool {
        match source {
            Source::Manifest => self.found_in_manifest,
            Source::Lockfile => self.found_in_lockfile,
            Source::InstalledTree => self.found_in_installed_tree,
            Source::DependencyTree => self.found_in_dependency_tree,
        }
    }

    /// Sources that reported the package, in check-cost order.
    pub fn sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| self.found_in(*source))
            .collect()
    }

    pub fn is_positive(&self) -> bool {
        Source::ALL.iter().any(|source| self.found_in(*source))
    }
}

/// Results of one scan run, one record per configured identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub package_manager: PackageManagerKind,
    pub records: Vec<ScanRecord>,
}

impl ScanReport {
    pub fn new(package_manager: PackageManagerKind, records: Vec<ScanRecord>) -> Self {
        Self {
            package_manager,
            records,
        }
    }

    pub fn positive_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_positive()).count()
    }

    pub fn has_findings(&self) -> bool {
        self.records.iter().any(|r| r.is_positive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: &str) -> ScanRecord {
        ScanRecord::new(PackageIdentifier::parse(raw).unwrap())
    }

    #[test]
    fn test_record_starts_clean() {
        let r = record("evil@1.0.0");
        assert!(!r.is_positive());
        assert!(r.sources().is_empty());
    }

    #[test]
    fn test_any_source_makes_record_positive() {
        for source in Source::ALL {
            let mut r = record("evil@1.0.0");
            r.set(source, true);
            assert!(r.is_positive());
            assert_eq!(r.sources(), vec![source]);
        }
    }

    #[test]
    fn test_sources_in_check_order() {
        let mut r = record("evil@1.0.0");
        r.set(Source::DependencyTree, true);
        r.set(Source::Manifest, true);
        assert_eq!(r.sources(), vec![Source::Manifest, Source::DependencyTree]);
    }

    #[test]
    fn test_report_counts() {
        let mut positive = record("evil@1.0.0");
        positive.set(Source::Lockfile, true);
        let report = ScanReport::new(
            PackageManagerKind::Npm,
            vec![positive, record("clean-pkg@2.0.0")],
        );
        assert!(report.has_findings());
        assert_eq!(report.positive_count(), 1);

        let clean = ScanReport::new(PackageManagerKind::Npm, vec![record("clean-pkg@2.0.0")]);
        assert!(!clean.has_findings());
    }

    #[test]
    fn test_record_json_keys() {
        let mut r = record("@scope/evil@1.0.0");
        r.set(Source::InstalledTree, true);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["identifier"], "@scope/evil@1.0.0");
        assert_eq!(value["foundInInstalledTree"], true);
        assert_eq!(value["foundInManifest"], false);
    }
}

//! Project layout discovery.
//!
//! Finds the project root and works out which package manager owns it.
//! Both are computed once per run and treated as read-only afterwards.

use crate::command::CommandSpec;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const INSTALL_DIR: &str = "node_modules";

/// Returns the closest ancestor of `start` (inclusive) holding a `package.json`.
///
/// The filesystem root itself is never treated as a project root. Falls back
/// to `start` when no ancestor qualifies.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = Some(start);

    while let Some(dir) = current {
        let parent = dir.parent();
        if parent.is_none() {
            break;
        }
        if dir.join(MANIFEST_FILE).exists() {
            return dir.to_path_buf();
        }
        current = parent;
    }

    start.to_path_buf()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManagerKind {
    Npm,
    YarnClassic,
    YarnModern,
}

impl PackageManagerKind {
    /// Infers the package manager from lockfile presence.
    ///
    /// `yarn.lock` means yarn; a `.yarnrc.yml` next to it means yarn 2+.
    /// Everything else is npm.
    pub fn detect(root: &Path) -> Self {
        if root.join("yarn.lock").exists() {
            if root.join(".yarnrc.yml").exists() {
                PackageManagerKind::YarnModern
            } else {
                PackageManagerKind::YarnClassic
            }
        } else {
            PackageManagerKind::Npm
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::YarnClassic => "yarn-classic",
            PackageManagerKind::YarnModern => "yarn-modern",
        }
    }

    pub fn lockfile_name(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "package-lock.json",
            PackageManagerKind::YarnClassic | PackageManagerKind::YarnModern => "yarn.lock",
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => {
                if cfg!(target_os = "windows") {
                    "npm.cmd"
                } else {
                    "npm"
                }
            }
            PackageManagerKind::YarnClassic | PackageManagerKind::YarnModern => {
                if cfg!(target_os = "windows") {
                    "yarn.cmd"
                } else {
                    "yarn"
                }
            }
        }
    }

    /// The command that lists the resolved dependency tree for `name`.
    pub fn list_command(&self, name: &str, root: &Path) -> CommandSpec {
        let args: Vec<String> = match self {
            PackageManagerKind::Npm => vec![
                "ls".into(),
                name.into(),
                "--prefix".into(),
                root.display().to_string(),
                "--all".into(),
            ],
            PackageManagerKind::YarnClassic => vec![
                "list".into(),
                "--pattern".into(),
                name.into(),
                "--depth=Infinity".into(),
            ],
            PackageManagerKind::YarnModern => vec![
                "info".into(),
                name.into(),
                "--all".into(),
                "--recursive".into(),
            ],
        };

        CommandSpec::new(self.program(), args).current_dir(root)
    }
}

impl std::fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let nested = tmp.path().join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), tmp.path());
        assert_eq!(find_project_root(tmp.path()), tmp.path());
    }

    #[test]
    fn test_find_project_root_prefers_closest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let inner = tmp.path().join("packages").join("app");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        assert_eq!(find_project_root(&inner), inner);
    }

    #[test]
    fn test_detect_package_manager() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(PackageManagerKind::detect(tmp.path()), PackageManagerKind::Npm);

        fs::write(tmp.path().join("yarn.lock"), "").unwrap();
        assert_eq!(
            PackageManagerKind::detect(tmp.path()),
            PackageManagerKind::YarnClassic
        );

        fs::write(tmp.path().join(".yarnrc.yml"), "").unwrap();
        assert_eq!(
            PackageManagerKind::detect(tmp.path()),
            PackageManagerKind::YarnModern
        );
    }

    #[test]
    fn test_lockfile_names() {
        assert_eq!(PackageManagerKind::Npm.lockfile_name(), "package-lock.json");
        assert_eq!(PackageManagerKind::YarnClassic.lockfile_name(), "yarn.lock");
        assert_eq!(PackageManagerKind::YarnModern.lockfile_name(), "yarn.lock");
    }

    #[test]
    fn test_list_commands() {
        let root = Path::new("/project");

        let npm = PackageManagerKind::Npm.list_command("malware", root);
        assert_eq!(npm.args, vec!["ls", "malware", "--prefix", "/project", "--all"]);

        let classic = PackageManagerKind::YarnClassic.list_command("malware", root);
        assert_eq!(
            classic.args,
            vec!["list", "--pattern", "malware", "--depth=Infinity"]
        );

        let modern = PackageManagerKind::YarnModern.list_command("@scope/malware", root);
        assert_eq!(
            modern.args,
            vec!["info", "@scope/malware", "--all", "--recursive"]
        );
        assert_eq!(modern.cwd.as_deref(), Some(root));
    }
}

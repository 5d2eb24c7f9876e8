use super::summary_line;
use crate::model::{ScanReport, Source};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "package.json")]
    manifest: &'static str,
    #[tabled(rename = "lock file")]
    lockfile: &'static str,
    #[tabled(rename = "node_modules")]
    installed: &'static str,
    #[tabled(rename = "dependency tree")]
    tree: &'static str,
    #[tabled(rename = "Verdict")]
    verdict: String,
}

pub fn render_table(report: &ScanReport) -> String {
    let mut out = format!("Package manager: {}\n\n", report.package_manager);

    if report.records.is_empty() {
        out.push_str("No packages configured.\n");
    } else {
        let rows: Vec<RecordRow> = report
            .records
            .iter()
            .map(|r| RecordRow {
                package: r.identifier.to_string(),
                manifest: mark(r.found_in(Source::Manifest)),
                lockfile: mark(r.found_in(Source::Lockfile)),
                installed: mark(r.found_in(Source::InstalledTree)),
                tree: mark(r.found_in(Source::DependencyTree)),
                verdict: format_verdict(r.is_positive()),
            })
            .collect();

        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&summary_line(report));
    out
}

fn mark(found: bool) -> &'static str {
    if found {
        "found"
    } else {
        "-"
    }
}

fn format_verdict(positive: bool) -> String {
    if positive {
        "\x1b[31mMALWARE\x1b[0m".to_string()
    } else {
        "\x1b[32mclean\x1b[0m".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageIdentifier, ScanRecord};
    use crate::project::PackageManagerKind;

    #[test]
    fn test_render_table() {
        let mut evil = ScanRecord::new(PackageIdentifier::parse("@scope/evil@1.0.0").unwrap());
        evil.set(Source::InstalledTree, true);
        let clean = ScanRecord::new(PackageIdentifier::parse("clean-pkg@2.0.0").unwrap());
        let report = ScanReport::new(PackageManagerKind::YarnClassic, vec![evil, clean]);

        let table = render_table(&report);
        assert!(table.starts_with("Package manager: yarn-classic"));
        assert!(table.contains("@scope/evil@1.0.0"));
        assert!(table.contains("node_modules"));
        assert!(table.contains("MALWARE"));
        assert!(table.ends_with("Scanned 2 package(s): malware found in 1"));
    }

    #[test]
    fn test_render_empty_table() {
        let report = ScanReport::new(PackageManagerKind::Npm, Vec::new());
        let table = render_table(&report);
        assert!(table.contains("No packages configured."));
        assert!(table.ends_with("Scanned 0 package(s): all clean"));
    }
}

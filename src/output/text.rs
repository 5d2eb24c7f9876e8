use super::summary_line;
use crate::model::{ScanRecord, ScanReport};

pub fn render_text(report: &ScanReport) -> String {
    let mut lines = vec!["--- Scan Results ---".to_string(), String::new()];

    for record in &report.records {
        lines.push(record_line(record));
    }

    lines.push(String::new());
    lines.push(summary_line(report));
    lines.join("\n")
}

fn record_line(record: &ScanRecord) -> String {
    if !record.is_positive() {
        return format!("{}: clean", record.identifier);
    }

    let sources: Vec<&str> = record
        .sources()
        .iter()
        .map(|s| s.display_name())
        .collect();
    format!(
        "{}: MALWARE DETECTED — found in {}",
        record.identifier,
        sources.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageIdentifier, Source};
    use crate::project::PackageManagerKind;

    fn record(raw: &str, sources: &[Source]) -> ScanRecord {
        let mut record = ScanRecord::new(PackageIdentifier::parse(raw).unwrap());
        for source in sources {
            record.set(*source, true);
        }
        record
    }

    #[test]
    fn test_clean_report() {
        let report = ScanReport::new(PackageManagerKind::Npm, vec![record("clean-pkg@2.0.0", &[])]);
        let text = render_text(&report);
        assert!(text.starts_with("--- Scan Results ---"));
        assert!(text.contains("\nclean-pkg@2.0.0: clean\n"));
        assert!(text.ends_with("Scanned 1 package(s): all clean"));
    }

    #[test]
    fn test_positive_sources_enumerated() {
        let report = ScanReport::new(
            PackageManagerKind::Npm,
            vec![
                record("evil@1.0.0", &[Source::DependencyTree, Source::Lockfile]),
                record("clean-pkg@2.0.0", &[]),
            ],
        );
        let text = render_text(&report);
        assert!(
            text.contains("evil@1.0.0: MALWARE DETECTED — found in lock file, dependency tree")
        );
        assert!(text.contains("clean-pkg@2.0.0: clean"));
        assert!(text.ends_with("Scanned 2 package(s): malware found in 1"));
    }
}

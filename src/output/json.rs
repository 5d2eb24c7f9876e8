use crate::model::ScanReport;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ScanReport,
    scanned: usize,
    positive: usize,
    malware_found: bool,
}

pub fn render_json(report: &ScanReport) -> Result<String> {
    let json = JsonReport {
        report,
        scanned: report.records.len(),
        positive: report.positive_count(),
        malware_found: report.has_findings(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

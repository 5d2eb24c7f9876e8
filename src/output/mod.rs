mod json;
mod table;
mod text;

pub use json::render_json;
pub use table::render_table;
pub use text::render_text;

use crate::model::ScanReport;
use anyhow::Result;

/// Output format for scan reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per identifier
    Text,
    /// Human-readable table with one column per source
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use 'text', 'table', or 'json'",
                s
            )),
        }
    }
}

pub fn format_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => render_json(report),
    }
}

pub fn print_report(report: &ScanReport, format: OutputFormat) -> Result<()> {
    println!("{}", format_report(report, format)?);
    Ok(())
}

/// The closing line shared by the text and table formats.
fn summary_line(report: &ScanReport) -> String {
    let scanned = report.records.len();
    let positive = report.positive_count();

    if positive == 0 {
        format!("Scanned {} package(s): all clean", scanned)
    } else {
        format!("Scanned {} package(s): malware found in {}", scanned, positive)
    }
}

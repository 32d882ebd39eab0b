//! Output formatting and persistence for generated reports.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::report::ReportData;

/// Prints a report as pretty JSON to stdout.
pub fn print_json(report: &ReportData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty JSON to the given path.
pub fn write_json(path: &Path, report: &ReportData) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

//! Spreadsheet input: the reader seam and its CSV/XLSX implementations.

mod csv;
mod reader;
mod xlsx;

pub use self::csv::CsvReader;
pub use self::reader::SpreadsheetReader;
pub use self::xlsx::XlsxReader;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported input formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    Csv,
    Xlsx,
}

impl SpreadsheetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("csv") {
            Some(SpreadsheetFormat::Csv)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Some(SpreadsheetFormat::Xlsx)
        } else {
            None
        }
    }
}

/// Builds the reader appropriate for the detected format.
pub fn open_reader(format: SpreadsheetFormat, path: &Path) -> Box<dyn SpreadsheetReader> {
    match format {
        SpreadsheetFormat::Csv => Box::new(CsvReader::new(path)),
        SpreadsheetFormat::Xlsx => Box::new(XlsxReader::new(path)),
    }
}

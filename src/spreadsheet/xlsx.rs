use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::error::SpreadsheetError;
use crate::spreadsheet::reader::SpreadsheetReader;

/// XLSX-backed reader over the workbook's first sheet. The first row is the
/// header; cell text is trimmed on read.
pub struct XlsxReader {
    path: PathBuf,
}

impl XlsxReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn first_sheet(&self) -> Result<Range<Data>, SpreadsheetError> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SpreadsheetError::EmptyWorkbook)?;
        Ok(workbook.worksheet_range(&sheet)?)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

#[async_trait]
impl SpreadsheetReader for XlsxReader {
    async fn columns(&self) -> Result<Vec<String>, SpreadsheetError> {
        let range = self.first_sheet()?;
        Ok(range
            .rows()
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default())
    }

    async fn process(&self) -> Result<Vec<HashMap<String, String>>, SpreadsheetError> {
        let range = self.first_sheet()?;
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header_row.iter().map(cell_text).collect();

        let mut records = Vec::new();
        for row in rows {
            let mut record = HashMap::new();
            for (index, header) in headers.iter().enumerate() {
                let value = row.get(index).map(cell_text).unwrap_or_default();
                record.insert(header.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }
}

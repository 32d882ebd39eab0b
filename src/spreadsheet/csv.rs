use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};

use crate::error::SpreadsheetError;
use crate::spreadsheet::reader::SpreadsheetReader;

/// CSV-backed reader. Cell text is trimmed on read.
pub struct CsvReader {
    path: PathBuf,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<csv::Reader<std::fs::File>, SpreadsheetError> {
        Ok(ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)?)
    }
}

#[async_trait]
impl SpreadsheetReader for CsvReader {
    async fn columns(&self) -> Result<Vec<String>, SpreadsheetError> {
        let mut reader = self.open()?;
        let headers = reader.headers()?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    async fn process(&self) -> Result<Vec<HashMap<String, String>>, SpreadsheetError> {
        let mut reader = self.open()?;
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: HashMap<String, String> = result?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_columns_are_trimmed_in_file_order() {
        let file = fixture("cpf , Requirements,Tests\n123,MA,MPA\n");
        let reader = CsvReader::new(file.path());
        let columns = reader.columns().await.unwrap();
        assert_eq!(columns, ["cpf", "Requirements", "Tests"]);
    }

    #[tokio::test]
    async fn test_process_keys_rows_by_header() {
        let file = fixture("cpf,Requirements,Tests\n123, MA ,\n456,MPA,MANA\n");
        let reader = CsvReader::new(file.path());

        let records = reader.process().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["cpf"], "123");
        assert_eq!(records[0]["Requirements"], "MA");
        assert_eq!(records[0]["Tests"], "");
        assert_eq!(records[1]["Tests"], "MANA");

        // idempotent for the same file
        let again = reader.process().await.unwrap();
        assert_eq!(again.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let reader = CsvReader::new("/nonexistent/grades.csv");
        assert!(reader.columns().await.is_err());
    }
}

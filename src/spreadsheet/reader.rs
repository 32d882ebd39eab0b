use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SpreadsheetError;

/// Read access to an uploaded spreadsheet.
///
/// Reads are awaited but non-cooperative: no partial progress is observable
/// before a call returns.
#[async_trait]
pub trait SpreadsheetReader: Send + Sync {
    /// Header row, trimmed cell text, in file order.
    async fn columns(&self) -> Result<Vec<String>, SpreadsheetError>;

    /// Full row set keyed by header. May be called multiple times
    /// idempotently for the same file.
    async fn process(&self) -> Result<Vec<HashMap<String, String>>, SpreadsheetError>;
}

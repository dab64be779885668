//! Spreadsheet reading: the first worksheet becomes text records

use crate::error::IngestError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// Extensions read as workbooks rather than delimited text
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "ods"];

/// Whether `path` names a workbook
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Read the first worksheet of `path` as rows of trimmed cell text
///
/// Rows whose cells are all empty are skipped, matching blank lines in
/// delimited text.
pub fn records(path: &Path) -> Result<Vec<Vec<String>>, IngestError> {
    let failed = |message: String| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| failed(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| failed("workbook has no sheets".to_string()))?
        .map_err(|e| failed(e.to_string()))?;

    let records: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    debug!(path = %path.display(), rows = records.len(), "Read worksheet");
    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

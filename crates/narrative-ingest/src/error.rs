//! Error types for portfolio ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing a holdings file
#[derive(Error, Debug)]
pub enum IngestError {
    /// No row yielded a ticker and a positive weight
    #[error("Could not parse file: no valid holdings in {rows} row(s)")]
    NoValidRows {
        /// Number of non-blank rows that were examined
        rows: usize,
    },

    /// The file contains nothing but whitespace
    #[error("Could not parse file: file is empty")]
    EmptyFile,

    /// Workbook could not be opened or has no readable sheet
    #[error("Failed to read spreadsheet {path}: {message}")]
    Spreadsheet {
        /// Path that was being read
        path: PathBuf,
        /// Reason reported by the workbook reader
        message: String,
    },

    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Import configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

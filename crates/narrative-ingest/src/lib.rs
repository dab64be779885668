//! Narrative Ingest
//!
//! Reads a brokerage export or hand-written holdings list and produces a
//! `Portfolio`.
//!
//! # Overview
//!
//! Holdings files come in many shapes. The importer accepts comma,
//! semicolon or tab separated text and spreadsheets (first sheet only),
//! looks for a header row naming a ticker column and a weight column, and
//! otherwise falls back to reading columns by position.
//!
//! ```text
//! file → records → ParseOutcome → Vec<Holding> → Portfolio
//! ```
//!
//! A file that yields no valid rows is an error, never an empty portfolio.
//!
//! # Example Usage
//!
//! ```no_run
//! use narrative_ingest::{import_portfolio, ImportConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let portfolio = import_portfolio("holdings.csv", None, chrono::Utc::now(), &ImportConfig::default())?;
//! println!("{} holdings", portfolio.holdings.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
pub mod csv;
mod error;
mod parser;
pub mod spreadsheet;


pub use config::ImportConfig;
pub use error::IngestError;
pub use parser::{parse_weight, HeaderColumns, ParseOutcome};

use chrono::{DateTime, Utc};
use narrative_domain::{Holding, Portfolio};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Parse holdings text into a tagged outcome
pub fn parse_text(text: &str, config: &ImportConfig) -> ParseOutcome {
    let delimiter = config
        .delimiter
        .unwrap_or_else(|| csv::detect_delimiter(text));
    ParseOutcome::from_records(&csv::records(text, delimiter), config)
}

/// Parse holdings text, failing when nothing usable is found
///
/// # Errors
/// `EmptyFile` for blank input, `NoValidRows` when every row was dropped.
pub fn parse_holdings(text: &str, config: &ImportConfig) -> Result<Vec<Holding>, IngestError> {
    config.validate().map_err(IngestError::Config)?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyFile);
    }
    into_holdings(parse_text(text, config))
}

/// Parse already-split records, failing when nothing usable is found
///
/// # Errors
/// `EmptyFile` when there are no records, `NoValidRows` when every row was dropped.
pub fn parse_records(records: &[Vec<String>], config: &ImportConfig) -> Result<Vec<Holding>, IngestError> {
    config.validate().map_err(IngestError::Config)?;
    if records.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    into_holdings(ParseOutcome::from_records(records, config))
}

fn into_holdings(outcome: ParseOutcome) -> Result<Vec<Holding>, IngestError> {
    match outcome {
        ParseOutcome::HeaderDetected { holdings, .. }
        | ParseOutcome::PositionalFallback { holdings, .. } => Ok(holdings),
        ParseOutcome::Failed { rows } => Err(IngestError::NoValidRows { rows }),
    }
}

/// Read and parse a holdings file
///
/// `.xlsx`, `.xls`, `.xlsm` and `.ods` files are read as workbooks; anything
/// else as delimited text.
pub fn read_holdings<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<Vec<Holding>, IngestError> {
    let path = path.as_ref();
    if spreadsheet::is_spreadsheet(path) {
        return parse_records(&spreadsheet::records(path)?, config);
    }

    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_holdings(&text, config)
}

/// Import a holdings file as a new portfolio
///
/// The portfolio gets a fresh UUIDv7 id. Without an explicit `name` the
/// file stem is used.
pub fn import_portfolio<P: AsRef<Path>>(
    path: P,
    name: Option<&str>,
    now: DateTime<Utc>,
    config: &ImportConfig,
) -> Result<Portfolio, IngestError> {
    let path = path.as_ref();
    let holdings = read_holdings(path, config)?;

    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported portfolio")
            .to_string(),
    };

    let portfolio = Portfolio::new(Uuid::now_v7().to_string(), name, holdings, now);
    info!(
        path = %path.display(),
        id = %portfolio.id,
        holdings = portfolio.holdings.len(),
        total_weight = portfolio.total_weight(),
        "Imported portfolio"
    );
    Ok(portfolio)
}

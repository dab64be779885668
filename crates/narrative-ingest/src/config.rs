//! Configuration for holdings import

use serde::{Deserialize, Serialize};

/// Configuration for holdings import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// How many leading rows to search for a header row
    pub header_scan_rows: usize,

    /// Upper-case tickers on import
    pub uppercase_tickers: bool,

    /// Field delimiter; `None` sniffs it from the first non-blank line
    pub delimiter: Option<char>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: 10,
            uppercase_tickers: true,
            delimiter: None,
        }
    }
}

impl ImportConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.header_scan_rows == 0 {
            return Err("header_scan_rows must be greater than 0".to_string());
        }
        if let Some(d) = self.delimiter {
            if d == '"' || d == '\n' || d == '\r' {
                return Err(format!("delimiter {:?} is not allowed", d));
            }
        }
        Ok(())
    }
}

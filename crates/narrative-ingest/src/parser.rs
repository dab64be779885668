//! Turn delimited records into holdings
//!
//! Parsing first decides a column layout, then applies that layout's
//! extraction rule to every data row:
//!
//! - **Header detected**: a row within the scan window names both a
//!   ticker/symbol column and a weight/allocation/percent column
//! - **Positional fallback**: column 0 is the ticker, column 1 the name
//!   (when there are at least three columns), the last column the weight
//!
//! Rows without a ticker or a positive numeric weight are dropped.

use crate::config::ImportConfig;
use narrative_domain::Holding;
use tracing::debug;

const TICKER_KEYS: [&str; 2] = ["ticker", "symbol"];
const WEIGHT_KEYS: [&str; 4] = ["weight", "allocation", "percent", "%"];
const NAME_KEYS: [&str; 3] = ["name", "description", "company"];
const SHARES_KEYS: [&str; 2] = ["shares", "quantity"];
const PRICE_KEYS: [&str; 1] = ["price"];

/// Column positions found in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColumns {
    /// Index of the header row among non-blank records
    pub row: usize,
    /// Ticker column
    pub ticker: usize,
    /// Weight column
    pub weight: usize,
    /// Name column, if any
    pub name: Option<usize>,
    /// Share count column, if any
    pub shares: Option<usize>,
    /// Price column, if any
    pub price: Option<usize>,
}

impl HeaderColumns {
    /// Search the first `scan_rows` records for a usable header
    pub fn find(records: &[Vec<String>], scan_rows: usize) -> Option<Self> {
        records
            .iter()
            .take(scan_rows)
            .enumerate()
            .find_map(|(row, cells)| Self::from_cells(row, cells))
    }

    fn from_cells(row: usize, cells: &[String]) -> Option<Self> {
        let lowered: Vec<String> = cells.iter().map(|c| c.to_lowercase()).collect();
        let position = |keys: &[&str], skip: &[usize]| {
            lowered
                .iter()
                .enumerate()
                .find(|(i, cell)| !skip.contains(i) && keys.iter().any(|k| cell.contains(k)))
                .map(|(i, _)| i)
        };

        let ticker = position(&TICKER_KEYS, &[])?;
        let weight = position(&WEIGHT_KEYS, &[ticker])?;
        let name = position(&NAME_KEYS, &[ticker, weight]);
        let shares = position(&SHARES_KEYS, &[ticker, weight]);
        let price = position(&PRICE_KEYS, &[ticker, weight]);

        Some(Self {
            row,
            ticker,
            weight,
            name,
            shares,
            price,
        })
    }
}

/// Result of parsing a holdings file
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A header row located the columns
    HeaderDetected {
        /// Columns found
        columns: HeaderColumns,
        /// Holdings, in file order
        holdings: Vec<Holding>,
        /// Data rows that were dropped
        dropped: usize,
    },

    /// No header matched; columns were taken by position
    PositionalFallback {
        /// Holdings, in file order
        holdings: Vec<Holding>,
        /// Rows that were dropped
        dropped: usize,
    },

    /// No row produced a holding
    Failed {
        /// Non-blank rows examined
        rows: usize,
    },
}

impl ParseOutcome {
    /// Parse `records` with the given configuration
    pub fn from_records(records: &[Vec<String>], config: &ImportConfig) -> Self {
        let (columns, data) = match HeaderColumns::find(records, config.header_scan_rows) {
            Some(columns) => (Some(columns), &records[columns.row + 1..]),
            None => (None, records),
        };

        let mut holdings = Vec::new();
        let mut dropped = 0;
        for (idx, cells) in data.iter().enumerate() {
            let extracted = match &columns {
                Some(columns) => extract_by_header(cells, columns, config),
                None => extract_by_position(cells, config),
            };
            match extracted {
                Some(holding) => holdings.push(holding),
                None => {
                    dropped += 1;
                    debug!(row = idx, cells = ?cells, "Dropped holdings row");
                }
            }
        }

        if holdings.is_empty() {
            return ParseOutcome::Failed {
                rows: records.len(),
            };
        }

        match columns {
            Some(columns) => ParseOutcome::HeaderDetected {
                columns,
                holdings,
                dropped,
            },
            None => ParseOutcome::PositionalFallback { holdings, dropped },
        }
    }

    /// Holdings, if parsing succeeded
    pub fn holdings(&self) -> Option<&[Holding]> {
        match self {
            ParseOutcome::HeaderDetected { holdings, .. }
            | ParseOutcome::PositionalFallback { holdings, .. } => Some(holdings),
            ParseOutcome::Failed { .. } => None,
        }
    }

    /// Rows dropped during extraction
    pub fn dropped(&self) -> usize {
        match self {
            ParseOutcome::HeaderDetected { dropped, .. }
            | ParseOutcome::PositionalFallback { dropped, .. } => *dropped,
            ParseOutcome::Failed { rows } => *rows,
        }
    }
}

fn extract_by_header(cells: &[String], columns: &HeaderColumns, config: &ImportConfig) -> Option<Holding> {
    let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");
    let ticker = normalize_ticker(cell(columns.ticker), config)?;
    let weight = parse_weight(cell(columns.weight))?;
    let name = columns
        .name
        .map(cell)
        .filter(|n| !n.is_empty())
        .unwrap_or(ticker.as_str())
        .to_string();

    let mut holding = Holding::new(ticker, name, weight);
    holding.shares = columns.shares.and_then(|i| parse_number(cell(i)));
    holding.current_price = columns.price.and_then(|i| parse_number(cell(i)));
    Some(holding)
}

fn extract_by_position(cells: &[String], config: &ImportConfig) -> Option<Holding> {
    if cells.len() < 2 {
        return None;
    }
    let ticker = normalize_ticker(&cells[0], config)?;
    let weight = parse_weight(&cells[cells.len() - 1])?;
    let name = if cells.len() >= 3 && !cells[1].is_empty() {
        cells[1].clone()
    } else {
        ticker.clone()
    };
    Some(Holding::new(ticker, name, weight))
}

fn normalize_ticker(raw: &str, config: &ImportConfig) -> Option<String> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return None;
    }
    Some(if config.uppercase_tickers {
        ticker.to_uppercase()
    } else {
        ticker.to_string()
    })
}

/// Parse a weight cell into a fraction in (0, 1]
///
/// A trailing `%` always means percent. Without one, values above 1 are
/// read as percentages and values at or below 1 as fractions. Returns
/// `None` for blanks, non-numbers, non-positive values and anything above
/// 100%.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    let value = parse_number(number)?;
    if value <= 0.0 {
        return None;
    }

    let weight = if percent || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    (weight <= 1.0).then_some(weight)
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' ' | '_'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::records;

    fn parse(text: &str) -> ParseOutcome {
        ParseOutcome::from_records(&records(text, ','), &ImportConfig::default())
    }

    #[test]
    fn test_header_with_percent_weight() {
        let outcome = parse("Ticker,Name,Weight\nNVDA,NVIDIA,20%\n");
        let holdings = outcome.holdings().unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].ticker, "NVDA");
        assert_eq!(holdings[0].name, "NVIDIA");
        assert!((holdings[0].weight - 0.20).abs() < 1e-12);
        assert!(matches!(outcome, ParseOutcome::HeaderDetected { .. }));
    }

    #[test]
    fn test_header_matching_is_substring_and_case_insensitive() {
        let outcome = parse("Account: 123\nSYMBOL,Security Description,Allocation (%)\nmsft,Microsoft,15\n");
        match outcome {
            ParseOutcome::HeaderDetected { columns, holdings, .. } => {
                assert_eq!(columns.row, 1);
                assert_eq!(columns.name, Some(1));
                assert_eq!(holdings[0].ticker, "MSFT");
                assert!((holdings[0].weight - 0.15).abs() < 1e-12);
            }
            other => panic!("expected header layout, got {:?}", other),
        }
    }

    #[test]
    fn test_header_picks_up_shares_and_price() {
        let outcome = parse("Symbol,Shares,Price,Weight\nAMD,120,\"$1,150.50\",0.08\n");
        let h = &outcome.holdings().unwrap()[0];
        assert_eq!(h.shares, Some(120.0));
        assert_eq!(h.current_price, Some(1150.5));
        // No name column: name falls back to the ticker
        assert_eq!(h.name, "AMD");
    }

    #[test]
    fn test_positional_fallback() {
        let outcome = parse("NVDA,NVIDIA,0.2\nTLT,0.08\n");
        match outcome {
            ParseOutcome::PositionalFallback { holdings, dropped } => {
                assert_eq!(dropped, 0);
                assert_eq!(holdings[0].name, "NVIDIA");
                assert_eq!(holdings[1].ticker, "TLT");
                assert_eq!(holdings[1].name, "TLT");
                assert!((holdings[1].weight - 0.08).abs() < 1e-12);
            }
            other => panic!("expected positional layout, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_uses_last_column_for_weight() {
        let outcome = parse("VST,Vistra,Utilities,7\n");
        let h = &outcome.holdings().unwrap()[0];
        assert!((h.weight - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_bad_rows_dropped() {
        let outcome = parse("Ticker,Weight\nNVDA,20\n,10\nAMD,abc\nTSLA,0\nCASH,-5\nAVGO,8%\n");
        assert_eq!(outcome.holdings().unwrap().len(), 2);
        assert_eq!(outcome.dropped(), 4);
    }

    #[test]
    fn test_zero_valid_rows_fails() {
        let outcome = parse("Ticker,Name,Weight\nNVDA,NVIDIA,n/a\n");
        assert_eq!(outcome, ParseOutcome::Failed { rows: 2 });
        assert!(outcome.holdings().is_none());
    }

    #[test]
    fn test_lowercase_kept_when_configured() {
        let config = ImportConfig {
            uppercase_tickers: false,
            ..Default::default()
        };
        let outcome = ParseOutcome::from_records(&records("Ticker,Weight\nbrk.b,0.1\n", ','), &config);
        assert_eq!(outcome.holdings().unwrap()[0].ticker, "brk.b");
    }

    #[test]
    fn test_parse_weight_rules() {
        assert_eq!(parse_weight("0.2"), Some(0.2));
        assert_eq!(parse_weight("1"), Some(1.0));
        assert_eq!(parse_weight("20"), Some(0.2));
        assert_eq!(parse_weight("0.5%"), Some(0.005));
        assert_eq!(parse_weight(" 12.5 % "), Some(0.125));
        assert_eq!(parse_weight("150"), None);
        assert_eq!(parse_weight("0"), None);
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("NaN"), None);
    }
}

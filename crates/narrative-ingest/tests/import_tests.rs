//! Integration tests for importing holdings files from disk

use chrono::{TimeZone, Utc};
use narrative_ingest::{import_portfolio, read_holdings, ImportConfig, IngestError};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn holdings_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().prefix("growth").suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_import_csv_file() {
    let file = holdings_file(
        ".csv",
        "Ticker,Name,Weight\nNVDA,NVIDIA,20%\nMSFT,Microsoft,15%\nTLT,Long-Term Treasury,8%\n",
    );
    let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let portfolio = import_portfolio(file.path(), Some("Growth"), now, &ImportConfig::default()).unwrap();

    assert_eq!(portfolio.name, "Growth");
    assert_eq!(portfolio.holdings.len(), 3);
    assert_eq!(portfolio.created_at, now);
    assert_eq!(portfolio.updated_at, now);
    assert!((portfolio.total_weight() - 0.43).abs() < 1e-9);
    assert!(portfolio.validate().is_ok());

    // UUIDv7: version nibble is 7
    let id = uuid::Uuid::parse_str(&portfolio.id).unwrap();
    assert_eq!(id.get_version_num(), 7);
}

#[test]
fn test_name_defaults_to_file_stem() {
    let file = holdings_file(".tsv", "NVDA\tNVIDIA\t0.2\n");
    let portfolio = import_portfolio(file.path(), None, Utc::now(), &ImportConfig::default()).unwrap();
    assert!(portfolio.name.starts_with("growth"));
    assert!(!portfolio.name.ends_with(".tsv"));
}

#[test]
fn test_each_import_gets_a_new_id() {
    let file = holdings_file(".csv", "Ticker,Weight\nNVDA,0.2\n");
    let a = import_portfolio(file.path(), None, Utc::now(), &ImportConfig::default()).unwrap();
    let b = import_portfolio(file.path(), None, Utc::now(), &ImportConfig::default()).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_unparseable_file_is_error() {
    let file = holdings_file(".csv", "Ticker,Name,Weight\nNVDA,NVIDIA,\n");
    let result = read_holdings(file.path(), &ImportConfig::default());
    assert!(matches!(result, Err(IngestError::NoValidRows { .. })));
}

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

#[test]
fn test_import_xlsx_first_sheet() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("Broker Export.xlsx");
    std::fs::copy(fixture("holdings.xlsx"), &path).unwrap();

    let portfolio = import_portfolio(&path, None, Utc::now(), &ImportConfig::default()).unwrap();
    assert_eq!(portfolio.name, "Broker Export");

    // Numeric cells: 0.2 as-is, 8 read as a percentage, the zero-weight row dropped
    let holdings = &portfolio.holdings;
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].ticker, "NVDA");
    assert_eq!(holdings[0].name, "NVIDIA");
    assert!((holdings[0].weight - 0.2).abs() < 1e-12);
    assert_eq!(holdings[1].ticker, "TLT");
    assert!((holdings[1].weight - 0.08).abs() < 1e-12);
}

#[test]
fn test_corrupt_spreadsheet_is_error() {
    let file = holdings_file(".xlsx", "PK\u{3}\u{4}not really a workbook");
    let result = read_holdings(file.path(), &ImportConfig::default());
    assert!(matches!(result, Err(IngestError::Spreadsheet { .. })));
}

#[test]
fn test_missing_file_is_read_error() {
    let result = read_holdings("/no/such/holdings.csv", &ImportConfig::default());
    assert!(matches!(result, Err(IngestError::Read { .. })));
}

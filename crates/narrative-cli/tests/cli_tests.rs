//! End-to-end command tests against files on disk.

use chrono::Utc;
use narrative_cli::cli::ListArgs;
use narrative_cli::commands::{execute_decay, execute_exposure, execute_list};
use narrative_cli::config::OutputFormat;
use narrative_cli::{CliError, Config, Context, Formatter};
use narrative_store::sample_catalog;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_catalog(dir: &Path, keep: &[&str]) -> std::path::PathBuf {
    let mut catalog = sample_catalog(Utc::now());
    catalog.narratives.retain(|n| keep.contains(&n.id.as_str()));
    let path = dir.join("catalog.json");
    fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
    path
}

fn context_from(config_path: &Path) -> Result<Context, CliError> {
    let config = Config::load(Some(config_path))?;
    let formatter = Formatter::new(config.settings.format, false);
    Context::load(config, formatter, None, Utc::now())
}

#[test]
fn test_config_points_at_catalog_and_portfolio() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path(), &["fed-rate-cuts", "ai-capex-supercycle"]);
    let holdings = dir.path().join("holdings.csv");
    fs::write(&holdings, "Symbol,Description,Weight\nTLT,Long Treasuries,60%\nMSFT,Microsoft,40%\n").unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "catalog = {:?}\nportfolio = {:?}\n\n[settings]\nformat = \"json\"\n",
            catalog.display().to_string(),
            holdings.display().to_string()
        ),
    )
    .unwrap();

    let ctx = context_from(&config_path).unwrap();
    assert_eq!(ctx.formatter.format(), OutputFormat::Json);
    assert_eq!(ctx.store.len(), 2);

    let listed: serde_json::Value = serde_json::from_str(
        &execute_list(ListArgs { search: None, tag: None }, &ctx).unwrap(),
    )
    .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let exposures: serde_json::Value = serde_json::from_str(
        &execute_exposure(
            narrative_cli::cli::ExposureArgs {
                portfolio: None,
                top: None,
            },
            &ctx,
        )
        .unwrap(),
    )
    .unwrap();
    let ids: Vec<&str> = exposures["exposures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["narrative_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"fed-rate-cuts"));
    assert!(ids.contains(&"ai-capex-supercycle"));
}

#[test]
fn test_quiet_list_prints_ids() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path(), &["fed-rate-cuts"]);
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("catalog = {:?}\n\n[settings]\nformat = \"quiet\"\n", catalog.display().to_string()),
    )
    .unwrap();

    let ctx = context_from(&config_path).unwrap();
    let output = execute_list(ListArgs { search: None, tag: None }, &ctx).unwrap();
    assert_eq!(output.trim(), "fed-rate-cuts");
    assert!(execute_decay(&ctx).is_ok());
}

#[test]
fn test_missing_catalog_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "catalog = \"/nonexistent/catalog.json\"\n").unwrap();

    assert!(matches!(context_from(&config_path), Err(CliError::Store(_))));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[gateway]\nendpoint = \"\"\n").unwrap();

    assert!(matches!(context_from(&config_path), Err(CliError::Config(_))));
}

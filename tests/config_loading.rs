// tests/config_loading.rs

//! Config parsing, defaults, and validation.

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;

use tempfile::NamedTempFile;

use commitgen::config::{default_config_path, load_and_validate};
use commitgen::errors::CommitgenError;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("creating temp config");
    file.write_all(contents.as_bytes())
        .expect("writing temp config");
    file
}

#[test]
fn minimal_config_gets_default_limits() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[tool]
bin = "gemini"
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.tool.bin, "gemini");
    assert!(cfg.tool.args.is_empty());
    assert_eq!(cfg.limits.budget_ms, 40_000);
    assert_eq!(cfg.limits.grace_ms, 200);
    assert_eq!(cfg.limits.supersede_wait_ms, 1_500);

    Ok(())
}

#[test]
fn full_config_is_parsed() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[tool]
bin = "gemini"
args = ["-p", "generate", "-y"]

[limits]
budget_ms = 60000
grace_ms = 500
supersede_wait_ms = 2000
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.tool.args, vec!["-p", "generate", "-y"]);
    assert_eq!(cfg.limits.budget_ms, 60_000);
    assert_eq!(cfg.limits.grace_ms, 500);
    assert_eq!(cfg.limits.supersede_wait_ms, 2_000);

    let limits = cfg.limits.to_limits();
    assert_eq!(limits.budget.as_millis(), 60_000);

    Ok(())
}

#[test]
fn missing_tool_section_is_a_parse_error() {
    init_tracing();

    let file = write_config("[limits]\nbudget_ms = 1000\n");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, CommitgenError::TomlError(_)));
}

#[test]
fn empty_bin_is_rejected() {
    init_tracing();

    let file = write_config("[tool]\nbin = \"  \"\n");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, CommitgenError::ConfigError(_)));
}

#[test]
fn zero_budget_is_rejected() {
    init_tracing();

    let file = write_config("[tool]\nbin = \"gemini\"\n\n[limits]\nbudget_ms = 0\n");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, CommitgenError::ConfigError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    init_tracing();

    let err = load_and_validate("/nonexistent/Commitgen.toml").unwrap_err();
    assert!(matches!(err, CommitgenError::IoError(_)));
}

#[test]
fn default_config_path_is_commitgen_toml() {
    assert_eq!(default_config_path().to_str(), Some("Commitgen.toml"));
}

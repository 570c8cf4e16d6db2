// src/lib.rs

pub mod cli;
pub mod config;
pub mod discover;
pub mod errors;
pub mod fatal;
pub mod logging;
pub mod protocol;
pub mod sink;
pub mod supervise;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::discover::resolve_tool_path;
use crate::sink::{LogSink, StderrSink};
use crate::supervise::{RunSupervisor, ToolCommand};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - tool discovery
/// - the run supervisor
/// - payload delivery to the consumer (stdout or `--output`)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let program = resolve_tool_path(&cfg.tool.bin)?;
    let command = ToolCommand {
        program,
        args: cfg.tool.args.clone(),
        cwd: None,
    };

    if args.dry_run {
        print_dry_run(&cfg, &command);
        return Ok(());
    }

    let key = match args.key {
        Some(key) => key,
        None => default_run_key()?,
    };

    let sink: Arc<dyn LogSink> = Arc::new(StderrSink);
    let supervisor = RunSupervisor::new(cfg.limits.to_limits(), sink);

    let result_rx = supervisor.request(key.clone(), command).await?;

    match result_rx.await {
        Ok(Some(payload)) => deliver_payload(&payload, args.output.as_deref())?,
        Ok(None) => {
            // "No payload" is a valid outcome, not an error; any existing
            // target value stays untouched.
            info!(key = %key, "run produced no payload; leaving target untouched");
        }
        Err(_) => {
            info!(key = %key, "run superseded; no result delivered");
        }
    }

    Ok(())
}

/// Default run key: the current working directory, so concurrent
/// invocations from the same workspace supersede each other.
fn default_run_key() -> Result<String> {
    let cwd = std::env::current_dir().context("determining current directory for the run key")?;
    Ok(cwd.display().to_string())
}

/// Hand the extracted payload to the consumer.
fn deliver_payload(payload: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, payload)
                .with_context(|| format!("writing payload to '{path}'"))?;
            info!(path, "payload written");
        }
        None => {
            println!("{payload}");
        }
    }
    Ok(())
}

/// Simple dry-run output: print the resolved tool command and limits.
fn print_dry_run(cfg: &ConfigFile, command: &ToolCommand) {
    println!("commitgen dry-run");
    println!("  tool: {}", command.program.display());
    if !command.args.is_empty() {
        println!("  args: {:?}", command.args);
    }
    println!("  limits.budget_ms = {}", cfg.limits.budget_ms);
    println!("  limits.grace_ms = {}", cfg.limits.grace_ms);
    println!("  limits.supersede_wait_ms = {}", cfg.limits.supersede_wait_ms);
}

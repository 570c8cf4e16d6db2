// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `commitgen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "commitgen",
    version,
    about = "Generate a commit message by supervising an external AI CLI run.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Commitgen.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Commitgen.toml")]
    pub config: String,

    /// Logical key scoping "at most one live run".
    ///
    /// Defaults to the current working directory, so concurrent
    /// invocations from the same workspace supersede each other.
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,

    /// Write the extracted payload to this file instead of stdout.
    ///
    /// When the run produces no payload the file is left untouched.
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COMMITGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate config, print the resolved run, but don't execute.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

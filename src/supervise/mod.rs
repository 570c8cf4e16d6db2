// src/supervise/mod.rs

//! Run supervision layer.
//!
//! This module owns everything with real concurrency and failure handling:
//!
//! - [`supervisor`] accepts run requests and enforces at most one live run
//!   per key, superseding the previous run when a new request arrives.
//! - [`registry`] is the shared map of current runs with atomic replace
//!   and compare-and-finalize operations.
//! - [`runner`] drives a single spawned process: output streaming, the
//!   cancel/exit/deadline race, and result finalization.
//! - [`watchdog`] arms a wall-clock deadline measured from a fixed origin.
//! - [`kill`] escalates termination from graceful to forceful.

pub mod kill;
pub mod registry;
pub mod runner;
pub mod supervisor;
pub mod watchdog;

use std::path::PathBuf;
use std::time::Duration;

pub use kill::{terminate, KillOutcome};
pub use registry::{ActiveRun, RunRegistry};
pub use supervisor::RunSupervisor;
pub use watchdog::{ArmedWatchdog, Watchdog};

/// Canonical run-key type. Opaque to the supervision layer; the CLI uses
/// the working directory path.
pub type RunKey = String;

/// Monotonically increasing run identifier, unique across the process
/// lifetime. The id, never the key alone, decides whether a completion
/// still belongs to the current run.
pub type RunId = u64;

/// Lifecycle state of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Starting,
    Running,
    Superseded,
    TimedOut,
    Completed,
    Failed,
}

/// A resolved tool invocation: argv style, no shell involved.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Resolved executable path (see [`crate::discover`]).
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory for the child; inherited when `None`.
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    /// Short name used in sink status lines and log fields.
    pub fn display_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Timing knobs for supervision, from `[limits]` in the config.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Watchdog budget, measured from the process-lifetime origin.
    pub budget: Duration,
    /// Grace window between the graceful and forceful kill steps.
    pub grace: Duration,
    /// Bounded best-effort wait for a superseded run to terminate.
    pub supersede_wait: Duration,
}

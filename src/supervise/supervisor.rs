// src/supervise/supervisor.rs

//! Owns the run registry and the per-key supersession protocol.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::errors::{CommitgenError, Result};
use crate::sink::LogSink;

use super::registry::{ActiveRun, RunRegistry};
use super::runner::{run_attempt, RunContext};
use super::watchdog::Watchdog;
use super::{Limits, RunKey, RunState, ToolCommand};

/// Accepts run requests and guarantees at most one live run per key.
///
/// The deadline origin is captured once when the supervisor is created,
/// so every run in this process races the same fixed budget window.
pub struct RunSupervisor {
    registry: Arc<RunRegistry>,
    seq: AtomicU64,
    origin: Instant,
    limits: Limits,
    sink: Arc<dyn LogSink>,
}

impl RunSupervisor {
    pub fn new(limits: Limits, sink: Arc<dyn LogSink>) -> Self {
        Self {
            registry: Arc::new(RunRegistry::new()),
            seq: AtomicU64::new(0),
            origin: Instant::now(),
            limits,
            sink,
        }
    }

    /// Shared registry handle, exposed so callers (and tests) can observe
    /// which run is current for a key.
    pub fn registry(&self) -> Arc<RunRegistry> {
        self.registry.clone()
    }

    /// Request a run of `command` for `key`.
    ///
    /// Any run currently registered for the key is superseded first: its
    /// registry entry is removed synchronously, its process is then killed
    /// asynchronously by its own runner, and we wait for that runner up to
    /// the bounded supersede-wait window before moving on (best-effort,
    /// never longer).
    ///
    /// Returns a one-shot receiver for the run's result: `Some(payload)`
    /// or `None` exactly once if this run completes while still current,
    /// or a closed channel if this run is superseded in turn.
    pub async fn request(
        &self,
        key: impl Into<RunKey>,
        command: ToolCommand,
    ) -> Result<oneshot::Receiver<Option<String>>> {
        let key = key.into();
        let id = self.seq.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(prev) = self.registry.take(&key).await {
            self.supersede(&key, prev).await;
        }

        let state = RunState::Starting;
        info!(
            key = %key,
            run_id = id,
            state = ?state,
            tool = %command.display_name(),
            "starting run"
        );

        let child = match spawn_tool(&command) {
            Ok(child) => child,
            Err(err) => {
                self.sink
                    .line(&format!("[{} run error]: {err}", command.display_name()));
                return Err(err);
            }
        };
        self.sink
            .line(&format!("[{} started]", command.display_name()));

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let (result_tx, result_rx) = oneshot::channel();

        let ctx = RunContext {
            key: key.clone(),
            id,
            display: command.display_name(),
            limits: self.limits,
            registry: self.registry.clone(),
            sink: self.sink.clone(),
            watchdog: Watchdog::new(self.origin, self.limits.budget),
        };
        self.registry
            .register_with(key, id, cancel_tx, || {
                tokio::spawn(run_attempt(child, ctx, cancel_rx, result_tx))
            })
            .await;

        Ok(result_rx)
    }

    /// Supersede a previously-current run: signal its runner to cancel,
    /// then wait for it up to the configured window.
    async fn supersede(&self, key: &str, mut prev: ActiveRun) {
        let state = RunState::Superseded;
        info!(key = %key, run_id = prev.id, state = ?state, "superseding previous run");

        if let Some(cancel) = prev.cancel.take() {
            if cancel.send(()).is_err() {
                debug!(
                    key = %key,
                    run_id = prev.id,
                    "previous runner already finished while cancelling"
                );
            }
        }

        match tokio::time::timeout(self.limits.supersede_wait, prev.handle).await {
            Ok(_) => debug!(key = %key, run_id = prev.id, "superseded run terminated"),
            Err(_) => warn!(
                key = %key,
                run_id = prev.id,
                "superseded run did not terminate within the wait window; continuing"
            ),
        }
    }
}

/// Spawn the tool process: argv style, both pipes captured, stdin closed.
///
/// On unix the child gets its own session so the kill escalation can
/// signal the entire descendant tree.
fn spawn_tool(command: &ToolCommand) -> Result<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &command.cwd {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    cmd.spawn()
        .map_err(|err| CommitgenError::SpawnFailed(command.display_name(), err))
}

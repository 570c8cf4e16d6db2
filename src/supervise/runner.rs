// src/supervise/runner.rs

//! Drives a single tool process from spawn to finalization.

use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::fatal;
use crate::protocol::marker::is_marker;
use crate::protocol::{extract_payload, LineReassembler};
use crate::sink::LogSink;

use super::kill;
use super::registry::RunRegistry;
use super::watchdog::Watchdog;
use super::{Limits, RunId, RunKey, RunState};

/// Everything a runner needs to drive one run.
pub(crate) struct RunContext {
    pub key: RunKey,
    pub id: RunId,
    /// Tool name used in synthesized sink lines.
    pub display: String,
    pub limits: Limits,
    pub registry: Arc<RunRegistry>,
    pub sink: Arc<dyn LogSink>,
    pub watchdog: Watchdog,
}

/// Supervise one spawned process until it exits naturally, is superseded,
/// or times out.
///
/// - stdout chunks are appended raw (unfiltered) for payload extraction
///   AND streamed through the marker filter to the sink;
/// - stderr is filtered to the sink only, in its own pump task;
/// - a cancel signal (supersession) kills the process and delivers
///   nothing; dropping `result_tx` is what tells the consumer there will
///   never be a result;
/// - watchdog expiry kills the process and aborts the whole host.
pub(crate) async fn run_attempt(
    mut child: Child,
    ctx: RunContext,
    mut cancel_rx: oneshot::Receiver<()>,
    result_tx: oneshot::Sender<Option<String>>,
) {
    let mut state = RunState::Running;
    debug!(key = %ctx.key, run_id = ctx.id, state = ?state, "run entered running state");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stderr_task = stderr.map(|err| {
        let sink = ctx.sink.clone();
        tokio::spawn(pump_filtered(err, sink))
    });

    // Raw stdout chunks flow back to this task so the raw buffer, the
    // reassembler, and finalization all live on one control flow.
    let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(16);
    match stdout {
        Some(out) => {
            tokio::spawn(pump_raw(out, chunk_tx));
        }
        None => drop(chunk_tx),
    }

    let mut armed = ctx.watchdog.arm();
    let mut raw: Vec<u8> = Vec::new();
    let mut reassembler = LineReassembler::new();
    let mut stdout_done = false;
    let mut child_done = false;
    let mut cancel_closed = false;
    let mut exit: Option<std::process::ExitStatus> = None;

    while !(stdout_done && child_done) {
        tokio::select! {
            chunk = chunk_rx.recv(), if !stdout_done => {
                match chunk {
                    Some(chunk) => {
                        raw.extend_from_slice(&chunk);
                        for line in reassembler.feed(&chunk) {
                            if !is_marker(&line) {
                                ctx.sink.line(&line);
                            }
                        }
                    }
                    None => stdout_done = true,
                }
            }

            status = child.wait(), if !child_done => {
                match status {
                    Ok(status) => exit = Some(status),
                    Err(err) => {
                        error!(
                            key = %ctx.key,
                            run_id = ctx.id,
                            error = %err,
                            "waiting for tool process failed"
                        );
                    }
                }
                child_done = true;
            }

            cancel = &mut cancel_rx, if !cancel_closed => {
                match cancel {
                    Ok(()) => {
                        state = RunState::Superseded;
                        info!(
                            key = %ctx.key,
                            run_id = ctx.id,
                            state = ?state,
                            "run superseded; killing process and discarding output"
                        );
                        kill::terminate(&mut child, ctx.limits.grace).await;
                        return;
                    }
                    Err(_) => {
                        debug!(
                            key = %ctx.key,
                            run_id = ctx.id,
                            "cancel channel closed without explicit cancellation"
                        );
                        cancel_closed = true;
                    }
                }
            }

            _ = armed.expired() => {
                expire(&mut child, &ctx).await;
            }
        }
    }

    // Process gone, stdout at EOF. Wait for the stderr pump to flush its
    // remainder, still under watchdog protection (a grandchild could be
    // holding the pipe open).
    if let Some(handle) = stderr_task {
        tokio::select! {
            _ = handle => {}
            _ = armed.expired() => {
                expire(&mut child, &ctx).await;
            }
        }
    }
    armed.disarm();

    if let Some(fragment) = reassembler.flush() {
        if !is_marker(&fragment) {
            ctx.sink.line(&fragment);
        }
    }

    let success = exit.map(|status| status.success()).unwrap_or(false);
    let code = exit.and_then(|status| status.code()).unwrap_or(-1);
    state = if success {
        RunState::Completed
    } else {
        RunState::Failed
    };
    ctx.sink.line(&format!("[{} exited: code {code}]", ctx.display));
    info!(
        key = %ctx.key,
        run_id = ctx.id,
        exit_code = code,
        state = ?state,
        "tool process exited"
    );

    if !ctx.registry.finalize_if_current(&ctx.key, ctx.id).await {
        debug!(key = %ctx.key, run_id = ctx.id, "run is no longer current; discarding result");
        return;
    }

    // A tool may print a usable payload before failing, so extraction runs
    // regardless of the exit code.
    let payload = extract_payload(&String::from_utf8_lossy(&raw));
    if payload.is_none() {
        debug!(
            key = %ctx.key,
            run_id = ctx.id,
            "no well-formed sentinel pair in output; delivering no payload"
        );
    }
    let _ = result_tx.send(payload);
}

/// Watchdog expiry: notify, kill, and take the host down. Never returns.
async fn expire(child: &mut Child, ctx: &RunContext) {
    let state = RunState::TimedOut;
    ctx.sink.line(&format!(
        "[no response from {} within {}s; forcing termination]",
        ctx.display,
        ctx.limits.budget.as_secs()
    ));
    error!(
        key = %ctx.key,
        run_id = ctx.id,
        state = ?state,
        "watchdog expired; terminating run and aborting host"
    );
    kill::terminate(child, ctx.limits.grace).await;
    fatal::timed_out_abort()
}

/// Read raw stdout chunks and forward them to the runner.
async fn pump_raw(mut out: ChildStdout, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; 4096];
    loop {
        match out.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Stream stderr through the marker filter to the sink, flushing the
/// trailing fragment at EOF.
async fn pump_filtered(mut err: ChildStderr, sink: Arc<dyn LogSink>) {
    let mut reassembler = LineReassembler::new();
    let mut buf = [0u8; 4096];
    loop {
        match err.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                for line in reassembler.feed(&buf[..n]) {
                    if !is_marker(&line) {
                        sink.line(&line);
                    }
                }
            }
        }
    }
    if let Some(fragment) = reassembler.flush() {
        if !is_marker(&fragment) {
            sink.line(&fragment);
        }
    }
}

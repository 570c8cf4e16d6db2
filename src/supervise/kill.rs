// src/supervise/kill.rs

//! Graceful-then-forceful termination of a tool process.

use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

/// How a [`terminate`] call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// The process had already exited; neither kill step ran.
    AlreadyExited,
    /// The graceful request was enough.
    Graceful,
    /// The process survived the grace window and was force-killed.
    Forced,
}

/// Terminate `child`, escalating after `grace` if it does not cooperate.
///
/// Step 1 sends the platform's normal termination request; errors are
/// ignored since the process may already be gone. Step 2, after the grace
/// window, force-kills the process if it is still alive: on unix the
/// whole process group (the child runs in its own session, and the spawned
/// command may have launched children of its own), on windows the full
/// tree via `taskkill`. Every error on the forceful path is swallowed;
/// this function never fails.
pub async fn terminate(child: &mut Child, grace: Duration) -> KillOutcome {
    if let Ok(Some(status)) = child.try_wait() {
        debug!(?status, "process already exited; skipping termination");
        return KillOutcome::AlreadyExited;
    }

    let pid = child.id();
    request_graceful(child, pid);
    tokio::time::sleep(grace).await;

    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(?status, "process exited within grace window");
            KillOutcome::Graceful
        }
        _ => {
            warn!(?pid, "process still alive after grace window; force-killing tree");
            force_kill_tree(child, pid).await;
            KillOutcome::Forced
        }
    }
}

#[cfg(unix)]
fn request_graceful(_child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        // SIGTERM to the direct child only; the forceful path covers the
        // tree.
        unsafe {
            let _ = libc::kill(pid as i32, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn request_graceful(child: &mut Child, _pid: Option<u32>) {
    let _ = child.start_kill();
}

#[cfg(unix)]
async fn force_kill_tree(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        // The child was spawned in its own session (setsid), so the
        // negative pid addresses its whole process group.
        unsafe {
            let _ = libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }
    // Kills the direct child if the group signal missed it, and reaps it.
    let _ = child.kill().await;
}

#[cfg(not(unix))]
async fn force_kill_tree(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        let _ = tokio::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await;
    }
    let _ = child.kill().await;
}

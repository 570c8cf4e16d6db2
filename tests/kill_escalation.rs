// tests/kill_escalation.rs

//! Graceful-then-forceful termination behaviour.

#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use commitgen::supervise::{terminate, KillOutcome};

type TestResult = Result<(), Box<dyn Error>>;

const GRACE: Duration = Duration::from_millis(200);

fn spawn_sh(script: &str) -> tokio::process::Child {
    Command::new("sh")
        .arg("-c")
        .arg(script)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawning test process")
}

#[tokio::test]
async fn already_exited_process_skips_both_kill_steps() -> TestResult {
    init_tracing();

    let mut child = spawn_sh("exit 0");
    // Let it finish and be reaped before terminating.
    timeout(Duration::from_secs(5), child.wait()).await??;

    let outcome = terminate(&mut child, GRACE).await;
    assert_eq!(outcome, KillOutcome::AlreadyExited);
    Ok(())
}

#[tokio::test]
async fn cooperative_process_dies_within_the_grace_window() -> TestResult {
    init_tracing();

    let mut child = spawn_sh("sleep 30");

    let outcome = timeout(Duration::from_secs(5), terminate(&mut child, GRACE)).await?;
    assert_eq!(outcome, KillOutcome::Graceful);
    Ok(())
}

#[tokio::test]
async fn stubborn_process_is_force_killed() -> TestResult {
    init_tracing();

    // Ignore SIGTERM so only the forceful step can end the run.
    let mut child = spawn_sh("trap '' TERM; while :; do sleep 1; done");

    let outcome = timeout(Duration::from_secs(10), terminate(&mut child, GRACE)).await?;
    assert_eq!(outcome, KillOutcome::Forced);

    // The process is really gone afterwards.
    let status = timeout(Duration::from_secs(5), child.wait()).await;
    match status {
        Ok(Ok(_)) => {}
        // Already reaped by the forceful path.
        Ok(Err(_)) | Err(_) => {}
    }
    Ok(())
}

// tests/watchdog_deadline.rs

//! Watchdog arming, expiry, and disarm semantics.

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use commitgen::supervise::Watchdog;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn expires_after_the_remaining_budget() -> TestResult {
    init_tracing();

    let watchdog = Watchdog::new(Instant::now(), Duration::from_millis(50));
    let mut armed = watchdog.arm();

    timeout(Duration::from_secs(2), armed.expired()).await?;
    Ok(())
}

#[tokio::test]
async fn already_exhausted_budget_expires_on_a_deferred_tick() -> TestResult {
    init_tracing();

    // Origin lies in the past beyond the whole budget, so the remaining
    // time at arm-time is zero.
    let origin = Instant::now() - Duration::from_millis(100);
    let watchdog = Watchdog::new(origin, Duration::from_millis(10));
    assert_eq!(watchdog.remaining(), Duration::ZERO);

    let mut armed = watchdog.arm();
    timeout(Duration::from_secs(2), armed.expired()).await?;
    Ok(())
}

#[tokio::test]
async fn late_arm_inherits_a_shorter_window() -> TestResult {
    init_tracing();

    let watchdog = Watchdog::new(Instant::now(), Duration::from_secs(40));
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The budget runs from the fixed origin, not from arm-time.
    assert!(watchdog.remaining() <= Duration::from_secs(40) - Duration::from_millis(50));
    Ok(())
}

#[tokio::test]
async fn disarm_before_expiry_suppresses_it() -> TestResult {
    init_tracing();

    let watchdog = Watchdog::new(Instant::now(), Duration::from_millis(50));
    let mut armed = watchdog.arm();
    armed.disarm();

    // Wait well past the original deadline: expiry must never become
    // observable once disarmed.
    let fired = timeout(Duration::from_millis(300), armed.expired()).await;
    assert!(fired.is_err(), "disarmed watchdog must not expire");
    Ok(())
}

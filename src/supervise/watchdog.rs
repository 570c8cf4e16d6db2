// src/supervise/watchdog.rs

//! Wall-clock deadline for a run, measured from a fixed origin.

use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::debug;

/// Deadline factory.
///
/// `origin` is captured once per process lifetime, not per run, so a run
/// that starts late inherits a correspondingly shorter remaining budget
/// rather than a fresh window.
#[derive(Debug, Clone, Copy)]
pub struct Watchdog {
    origin: Instant,
    budget: Duration,
}

impl Watchdog {
    pub fn new(origin: Instant, budget: Duration) -> Self {
        Self { origin, budget }
    }

    /// Remaining budget as of now; zero once the deadline has passed.
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.origin.elapsed())
    }

    /// Arm the deadline.
    ///
    /// If the budget is already exhausted the expiry still completes on a
    /// deferred timer tick, never synchronously inside the caller's stack.
    pub fn arm(&self) -> ArmedWatchdog {
        let remaining = self.remaining();
        debug!(remaining_ms = remaining.as_millis() as u64, "arming watchdog");

        let (fire_tx, fire_rx) = oneshot::channel::<()>();
        let (disarm_tx, disarm_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(remaining) => {
                    // Receiver may be gone if the runner returned early.
                    let _ = fire_tx.send(());
                }
                _ = disarm_rx => {}
            }
        });

        ArmedWatchdog {
            fired: fire_rx,
            disarm: Some(disarm_tx),
        }
    }
}

/// One armed deadline.
///
/// Expiry is observable at most once per arm; disarming before expiry
/// guarantees it is never observed.
#[derive(Debug)]
pub struct ArmedWatchdog {
    fired: oneshot::Receiver<()>,
    disarm: Option<oneshot::Sender<()>>,
}

impl ArmedWatchdog {
    /// Resolves when the deadline expires. Pends forever once disarmed,
    /// which makes it safe as a `select!` branch.
    pub async fn expired(&mut self) {
        match (&mut self.fired).await {
            Ok(()) => {}
            // Disarmed: never resolve.
            Err(_) => std::future::pending::<()>().await,
        }
    }

    /// Defuse the deadline. A disarm that wins the race against the timer
    /// guarantees `expired` never resolves.
    pub fn disarm(&mut self) {
        if let Some(disarm) = self.disarm.take() {
            let _ = disarm.send(());
        }
    }
}

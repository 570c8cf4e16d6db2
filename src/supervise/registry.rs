// src/supervise/registry.rs

//! Shared map of current runs, one entry per key.

use std::collections::HashMap;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use super::{RunId, RunKey};

/// Bookkeeping for the run currently considered current for its key.
#[derive(Debug)]
pub struct ActiveRun {
    pub id: RunId,
    /// Cancellation signal into the runner; consumed on supersession.
    pub cancel: Option<oneshot::Sender<()>>,
    /// The Tokio task driving the run.
    pub handle: JoinHandle<()>,
}

/// Mapping from [`RunKey`] to the currently-current [`ActiveRun`].
///
/// At most one entry per key; entries are replaced, never merged. All
/// mutations go through this type so that replacing a run on supersession
/// and the "is this run still current" check at finalization are each one
/// atomic step. An old run's late completion can therefore never race a
/// newer run's registration into delivering a stale result.
#[derive(Debug, Default)]
pub struct RunRegistry {
    inner: Mutex<HashMap<RunKey, ActiveRun>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the current run for `key`, if any. The caller
    /// owns the supersession that follows; once taken, the old run can no
    /// longer pass [`finalize_if_current`].
    ///
    /// [`finalize_if_current`]: RunRegistry::finalize_if_current
    pub async fn take(&self, key: &str) -> Option<ActiveRun> {
        self.inner.lock().await.remove(key)
    }

    /// Atomically spawn a runner and register it as current for `key`.
    ///
    /// The spawn happens under the registry lock, so a run that completes
    /// immediately still blocks on [`finalize_if_current`] until its own
    /// registration is visible.
    ///
    /// [`finalize_if_current`]: RunRegistry::finalize_if_current
    pub async fn register_with(
        &self,
        key: RunKey,
        id: RunId,
        cancel: oneshot::Sender<()>,
        spawn: impl FnOnce() -> JoinHandle<()>,
    ) {
        let mut inner = self.inner.lock().await;
        let handle = spawn();
        inner.insert(
            key,
            ActiveRun {
                id,
                cancel: Some(cancel),
                handle,
            },
        );
    }

    /// If `id` is still the current run for `key`, remove the entry and
    /// return true; otherwise leave the registry untouched and return
    /// false. The id comparison is the sole authority for currency: the
    /// key alone is not enough, since a newer run may own it before the
    /// older run's process has actually exited.
    pub async fn finalize_if_current(&self, key: &str, id: RunId) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.get(key) {
            Some(current) if current.id == id => {
                inner.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Current run id for `key`, if one is registered.
    pub async fn current_id(&self, key: &str) -> Option<RunId> {
        self.inner.lock().await.get(key).map(|run| run.id)
    }
}

//! Trigger coordinator (spec.md §4.5.2, §9 "subprocess trigger"):
//! mutex + boolean coalescing so concurrently-arriving jobs never spawn more
//! than one in-flight drain, while a drain that's already running is
//! trusted to re-list the queue and pick up anything that arrived mid-pass.

use futures_util::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

/// Clonable handle; all Ingest Server handlers share one instance.
#[derive(Clone)]
pub struct TriggerCoordinator {
    running: Arc<Mutex<bool>>,
}

impl Default for TriggerCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerCoordinator {
    pub fn new() -> Self {
        Self { running: Arc::new(Mutex::new(false)) }
    }

    /// Called after a job is appended to the queue. If no drain is
    /// currently running, spawns `drain` as a background task and clears
    /// the flag on completion (or on panic, per spec.md §7 "Worker crash").
    /// If a drain is already running, this is a no-op — the in-flight pass
    /// re-lists the queue at its top and will find the new ticket.
    pub fn trigger<F, Fut>(&self, drain: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut running = self.running.lock();
        if *running {
            return;
        }
        *running = true;
        drop(running);

        let flag = self.running.clone();
        tokio::spawn(async move {
            let outcome = std::panic::AssertUnwindSafe(drain()).catch_unwind().await;
            if let Err(panic) = outcome {
                error!(?panic, "worker drain pass panicked");
            }
            *flag.lock() = false;
        });
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;

//! Provider Registry (spec.md §4.1): an ordered, priority-sorted list of
//! provider candidates, probed once at startup and then consulted with
//! sticky rotate-on-failure semantics — grounded on the teacher's
//! `RuntimeRouter` (`crates/daemon/src/adapters/agent/router.rs`), which
//! routes by a recorded, mutable pointer rather than re-deciding on every
//! call.
//!
//! "Sticky" means the pointer only ever moves in response to an explicit
//! `report_failure` call, never back on its own: a later success of a
//! higher-priority provider does **not** win the slot back (spec.md §4.1
//! "no automatic recovery to a higher-priority entry"). Each failure still
//! advances the pointer by one modulo the list length (spec.md §8), so once
//! every survivor has failed in turn, rotation wraps back to index 0 and
//! retries the original top-priority entry rather than staying pinned to
//! the last one forever.

use crate::error::ProviderError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout applied to each candidate's startup probe (spec.md §4.1).
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait HealthCheckable: Send + Sync {
    fn label(&self) -> &str;
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Holds the surviving (health-checked) candidates in priority order, plus a
/// pointer to the currently-in-use entry.
pub struct Registry<P: ?Sized> {
    entries: Vec<Arc<P>>,
    current: AtomicUsize,
}

impl<P: HealthCheckable + ?Sized> Registry<P> {
    /// Probe every candidate with `HEALTH_CHECK_TIMEOUT`; candidates that
    /// fail or time out are dropped, but priority order among survivors is
    /// preserved.
    pub async fn build(candidates: Vec<Arc<P>>) -> Self {
        let mut survivors = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, candidate.health_check()).await {
                Ok(Ok(())) => {
                    info!(provider = candidate.label(), "provider passed startup health check");
                    survivors.push(candidate);
                }
                Ok(Err(err)) => {
                    warn!(provider = candidate.label(), error = %err, "provider failed startup health check, excluded");
                }
                Err(_) => {
                    warn!(provider = candidate.label(), "provider health check timed out, excluded");
                }
            }
        }
        Self { entries: survivors, current: AtomicUsize::new(0) }
    }

    /// Skip the probe — used by tests and by callers that have already
    /// decided a fixed list of providers is usable.
    pub fn new_unchecked(entries: Vec<Arc<P>>) -> Self {
        Self { entries, current: AtomicUsize::new(0) }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Result<Arc<P>, ProviderError> {
        let idx = self.current.load(Ordering::SeqCst);
        self.entries.get(idx).cloned().ok_or(ProviderError::NoneAvailable)
    }

    /// Advance the pointer to the next entry, wrapping modulo the list
    /// length (spec.md §8 "cur_idx advances by 1 mod k"). With a single
    /// surviving entry this is a no-op — there's no fallback to rotate to.
    pub fn report_failure(&self) {
        let len = self.entries.len();
        if len <= 1 {
            warn!("provider rotation exhausted, no further fallback available");
            return;
        }
        let idx = self.current.load(Ordering::SeqCst);
        let next_idx = (idx + 1) % len;
        self.current.store(next_idx, Ordering::SeqCst);
        if let Some(next) = self.entries.get(next_idx) {
            warn!(provider = next.label(), "rotated to next provider after failure");
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

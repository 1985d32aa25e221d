use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Count of handler invocations currently in flight. The shutdown sequence
/// waits on it before the process exits.
#[derive(Debug, Default)]
pub struct OperationTracker {
    in_flight: AtomicUsize,
}

impl OperationTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an operation. The returned guard untracks it when dropped,
    /// whichever way the handler exits.
    pub fn track(self: &Arc<Self>) -> OperationGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        OperationGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn untrack(&self) {
        // Never wrap below zero on an unbalanced call.
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until no operations are in flight. Returns false if `timeout`
    /// elapsed first.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = self.in_flight();
            if remaining == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                tracing::warn!(remaining, "shutdown drain timed out with operations in flight");
                return false;
            }
            tracing::debug!(remaining, "waiting for in-flight operations");
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}

#[derive(Debug)]
pub struct OperationGuard {
    tracker: Arc<OperationTracker>,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.tracker.untrack();
    }
}

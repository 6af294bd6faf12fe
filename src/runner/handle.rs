use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{oneshot, watch};

use crate::runner::types::RunOutcome;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier for one run, unique within the process.
///
/// Labels log lines and JSON records so concurrent runs sharing a sink
/// stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    pub fn next() -> Self {
        Self(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one in-flight run.
///
/// Owns the cancellation flag and the single-fire outcome slot. The run
/// task is the only producer of the outcome, so the slot resolves exactly
/// once no matter how often `cancel` is called.
pub struct RunHandle {
    id: RunId,
    cancel_tx: Arc<watch::Sender<bool>>,
    outcome_rx: oneshot::Receiver<RunOutcome>,
}

impl RunHandle {
    pub(crate) fn new(
        id: RunId,
        cancel_tx: Arc<watch::Sender<bool>>,
        outcome_rx: oneshot::Receiver<RunOutcome>,
    ) -> Self {
        Self {
            id,
            cancel_tx,
            outcome_rx,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    /// Request cooperative cancellation.
    ///
    /// The run observes the flag at the next step boundary. Idempotent;
    /// a no-op once the outcome has been produced.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Detached canceller for this run, usable after the handle has been
    /// consumed by `wait` (e.g. from a signal handler task).
    pub fn canceller(&self) -> RunCanceller {
        RunCanceller {
            id: self.id,
            cancel_tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Non-blocking poll of the outcome slot. `Some` at most once.
    pub fn try_outcome(&mut self) -> Option<RunOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Whether the run has produced its outcome.
    pub fn is_finished(&self) -> bool {
        // The run task holds the only watch receiver; it drops on exit.
        self.cancel_tx.is_closed()
    }

    /// Await the terminal outcome, consuming the handle.
    pub async fn wait(self) -> RunOutcome {
        match self.outcome_rx.await {
            Ok(outcome) => outcome,
            // Run task dropped without resolving the slot. Not reachable
            // through the runner, which resolves on every exit path.
            Err(_) => RunOutcome::Failed {
                reason: "run task dropped before producing an outcome".to_string(),
            },
        }
    }
}

/// Cancellation-only view of a run.
#[derive(Clone)]
pub struct RunCanceller {
    id: RunId,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl RunCanceller {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunId::next();
        let b = RunId::next();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_cancel_flips_watch_flag() {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (_outcome_tx, outcome_rx) = oneshot::channel();
        let handle = RunHandle::new(RunId::next(), Arc::new(cancel_tx), outcome_rx);

        assert!(!*cancel_rx.borrow());
        handle.cancel();
        assert!(*cancel_rx.borrow());

        // Idempotent
        handle.cancel();
        assert!(*cancel_rx.borrow());
    }

    #[tokio::test]
    async fn test_canceller_outlives_handle() {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let handle = RunHandle::new(RunId::next(), Arc::new(cancel_tx), outcome_rx);

        let canceller = handle.canceller();
        outcome_tx.send(RunOutcome::Completed).unwrap();
        assert_eq!(handle.wait().await, RunOutcome::Completed);

        canceller.cancel();
        assert!(*cancel_rx.borrow());
    }

    #[tokio::test]
    async fn test_try_outcome_empty_then_resolved() {
        let (cancel_tx, _cancel_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let mut handle = RunHandle::new(RunId::next(), Arc::new(cancel_tx), outcome_rx);

        assert!(handle.try_outcome().is_none());
        outcome_tx.send(RunOutcome::Cancelled).unwrap();
        assert_eq!(handle.try_outcome(), Some(RunOutcome::Cancelled));
    }
}

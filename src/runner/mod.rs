pub mod handle;
pub mod types;
pub mod work;

use std::sync::Arc;

use tokio::sync::{oneshot, watch};

use crate::error::Result;
use crate::report::{CompletionObserver, ProgressSink};

pub use handle::{RunCanceller, RunHandle, RunId};
pub use types::{ProgressUpdate, RunOutcome, RunSpec};
pub use work::{StepWork, TimedWork};

/// Executes runs in the background.
///
/// Each `start` call spawns an independent run task: same work, sink and
/// observer, but its own cancellation flag and outcome slot. Runs share no
/// mutable state and need no locking.
pub struct Runner {
    work: Arc<dyn StepWork>,
    sink: Arc<dyn ProgressSink>,
    observer: Arc<dyn CompletionObserver>,
}

impl Runner {
    pub fn new(
        work: Arc<dyn StepWork>,
        sink: Arc<dyn ProgressSink>,
        observer: Arc<dyn CompletionObserver>,
    ) -> Self {
        Self {
            work,
            sink,
            observer,
        }
    }

    /// Start a run and return immediately with its handle.
    ///
    /// The run executes on the tokio scheduler; the caller's task is never
    /// blocked. The observer is invoked exactly once, before the handle's
    /// outcome slot resolves.
    pub fn start(&self, spec: RunSpec) -> Result<RunHandle> {
        spec.validate()?;

        let id = RunId::next();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancel_tx = Arc::new(cancel_tx);

        let work = Arc::clone(&self.work);
        let sink = Arc::clone(&self.sink);
        let observer = Arc::clone(&self.observer);

        tracing::info!(run = %id, title = %spec.title, steps = spec.steps, "Starting run");

        tokio::spawn(async move {
            // Step loop in its own task so a panicking work impl surfaces
            // as a join error instead of a missing outcome.
            let loop_work = Arc::clone(&work);
            let loop_sink = Arc::clone(&sink);
            let steps = spec.steps;
            let inner =
                tokio::spawn(
                    async move { run_loop(id, steps, loop_work, loop_sink, cancel_rx).await },
                );

            let outcome = match inner.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(run = %id, error = %e, "Run task panicked");
                    RunOutcome::Failed {
                        reason: format!("run task panicked: {e}"),
                    }
                }
            };

            observer.on_outcome(id, &spec.title, &outcome).await;
            let _ = outcome_tx.send(outcome);
        });

        Ok(RunHandle::new(id, cancel_tx, outcome_rx))
    }
}

/// Execute the steps of one run.
///
/// The cancellation flag is checked between steps only; a step in flight
/// runs to completion before the flag is observed.
async fn run_loop(
    id: RunId,
    steps: u32,
    work: Arc<dyn StepWork>,
    sink: Arc<dyn ProgressSink>,
    cancel_rx: watch::Receiver<bool>,
) -> RunOutcome {
    for step in 1..=steps {
        if *cancel_rx.borrow() {
            tracing::info!(run = %id, step, "Cancellation requested, stopping run");
            return RunOutcome::Cancelled;
        }

        if let Err(e) = work.execute(step, steps).await {
            tracing::error!(run = %id, step, error = %e, "Step failed");
            return RunOutcome::Failed {
                reason: e.to_string(),
            };
        }

        let update = ProgressUpdate::new(id, step, steps);
        sink.on_update(&update).await;
    }

    RunOutcome::Completed
}

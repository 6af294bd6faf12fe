pub mod console;
pub mod json;

use async_trait::async_trait;

use crate::runner::handle::RunId;
use crate::runner::types::{ProgressUpdate, RunOutcome};

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Consumer of ordered progress updates.
///
/// Called by the run task after each completed step, in step order.
/// Fire-and-forget from the runner's perspective: implementations must not
/// block indefinitely, or they stall their run's stream (other runs are
/// unaffected).
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_update(&self, update: &ProgressUpdate);
}

/// Consumer of the single terminal outcome of a run.
///
/// Invoked exactly once per run, before the outcome slot resolves, for
/// every outcome kind. Typically presents a one-time notification to the
/// user.
#[async_trait]
pub trait CompletionObserver: Send + Sync {
    async fn on_outcome(&self, id: RunId, title: &str, outcome: &RunOutcome);
}

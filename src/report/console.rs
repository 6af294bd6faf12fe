use async_trait::async_trait;

use crate::report::{CompletionObserver, ProgressSink};
use crate::runner::handle::RunId;
use crate::runner::types::{ProgressUpdate, RunOutcome};

/// Human-readable reporting: progress as log lines, completion as a
/// one-time notification line on stdout.
pub struct ConsoleReporter {
    notify_on_completion: bool,
}

impl ConsoleReporter {
    pub fn new(notify_on_completion: bool) -> Self {
        Self {
            notify_on_completion,
        }
    }
}

#[async_trait]
impl ProgressSink for ConsoleReporter {
    async fn on_update(&self, update: &ProgressUpdate) {
        tracing::info!(
            run = %update.run_id,
            percent = update.percent_complete,
            "{}",
            update.status_text
        );
    }
}

#[async_trait]
impl CompletionObserver for ConsoleReporter {
    async fn on_outcome(&self, id: RunId, title: &str, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed => {
                tracing::info!(run = %id, title, "Run completed");
                if self.notify_on_completion {
                    println!("{title}: Done");
                }
            }
            RunOutcome::Cancelled => {
                tracing::warn!(run = %id, title, "Run cancelled");
                println!("{title}: Cancelled");
            }
            RunOutcome::Failed { reason } => {
                tracing::error!(run = %id, title, error = %reason, "Run failed");
                println!("{title}: Failed ({reason})");
            }
        }
    }
}

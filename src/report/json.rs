use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::{CompletionObserver, ProgressSink};
use crate::runner::handle::RunId;
use crate::runner::types::{ProgressUpdate, RunOutcome};

/// Machine-readable reporting: one JSON record per line on stdout.
pub struct JsonReporter;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Record<'a> {
    Progress {
        #[serde(flatten)]
        update: &'a ProgressUpdate,
    },
    Outcome {
        run_id: RunId,
        title: &'a str,
        #[serde(flatten)]
        outcome: &'a RunOutcome,
        timestamp: DateTime<Utc>,
    },
}

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, record: &Record<'_>) {
        match serde_json::to_string(record) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize report record"),
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressSink for JsonReporter {
    async fn on_update(&self, update: &ProgressUpdate) {
        self.emit(&Record::Progress { update });
    }
}

#[async_trait]
impl CompletionObserver for JsonReporter {
    async fn on_outcome(&self, id: RunId, title: &str, outcome: &RunOutcome) {
        self.emit(&Record::Outcome {
            run_id: id,
            title,
            outcome,
            timestamp: Utc::now(),
        });
    }
}

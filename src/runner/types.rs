use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::runner::handle::RunId;

/// Description of one run: how many work steps to execute and the title
/// shown in progress output and the completion notification.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub title: String,
    pub steps: u32,
}

impl RunSpec {
    pub fn new(title: impl Into<String>, steps: u32) -> Self {
        Self {
            title: title.into(),
            steps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(AppError::InvalidRunSpec(
                "step count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single progress report emitted after a step finishes.
///
/// Updates for one run are delivered in step order, and `percent_complete`
/// never decreases over the life of the run.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub run_id: RunId,
    pub step: u32,
    pub steps: u32,
    pub percent_complete: u8,
    pub status_text: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressUpdate {
    pub fn new(run_id: RunId, step: u32, steps: u32) -> Self {
        Self {
            run_id,
            step,
            steps,
            percent_complete: percent_for_step(step, steps),
            status_text: format!("Step {step} of {steps} completed"),
            timestamp: Utc::now(),
        }
    }
}

/// Terminal state of a run. Produced exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum RunOutcome {
    /// All steps ran to completion.
    Completed,
    /// A step errored or panicked; remaining steps were skipped.
    Failed { reason: String },
    /// Cancellation was requested and observed at a step boundary.
    Cancelled,
}

pub(crate) fn percent_for_step(step: u32, steps: u32) -> u8 {
    ((f64::from(step) / f64::from(steps)) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_three_steps() {
        assert_eq!(percent_for_step(1, 3), 33);
        assert_eq!(percent_for_step(2, 3), 67);
        assert_eq!(percent_for_step(3, 3), 100);
    }

    #[test]
    fn test_percent_single_step() {
        assert_eq!(percent_for_step(1, 1), 100);
    }

    #[test]
    fn test_percent_rounds_to_nearest() {
        assert_eq!(percent_for_step(1, 7), 14); // 14.28..
        assert_eq!(percent_for_step(2, 7), 29); // 28.57..
        assert_eq!(percent_for_step(6, 7), 86); // 85.71..
    }

    #[test]
    fn test_percent_never_decreases() {
        for steps in 1..=50 {
            let mut last = 0;
            for step in 1..=steps {
                let p = percent_for_step(step, steps);
                assert!(p >= last, "percent decreased at step {step} of {steps}");
                last = p;
            }
            assert_eq!(last, 100);
        }
    }

    #[test]
    fn test_update_status_text() {
        let update = ProgressUpdate::new(RunId::next(), 2, 3);
        assert_eq!(update.status_text, "Step 2 of 3 completed");
        assert_eq!(update.percent_complete, 67);
    }

    #[test]
    fn test_spec_rejects_zero_steps() {
        assert!(RunSpec::new("Task", 0).validate().is_err());
        assert!(RunSpec::new("Task", 1).validate().is_ok());
    }
}

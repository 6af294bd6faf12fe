use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// One unit of work within a run.
///
/// Implementations are invoked once per step, in step order. Returning an
/// error aborts the run; remaining steps are skipped.
#[async_trait]
pub trait StepWork: Send + Sync {
    async fn execute(&self, step: u32, steps: u32) -> Result<()>;
}

/// Stand-in for real work: sleeps a fixed duration per step.
///
/// Deliberately does not observe the cancellation flag, so cancellation
/// keeps whole-step granularity. A work implementation needing finer
/// response can subscribe to the run's watch channel itself.
pub struct TimedWork {
    delay: Duration,
}

impl TimedWork {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StepWork for TimedWork {
    async fn execute(&self, _step: u32, _steps: u32) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timed_work_sleeps_per_step() {
        let work = TimedWork::new(Duration::from_millis(500));
        let before = tokio::time::Instant::now();
        work.execute(1, 3).await.unwrap();
        assert_eq!(before.elapsed(), Duration::from_millis(500));
    }
}

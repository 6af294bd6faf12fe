pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod shutdown;

pub use error::{AppError, Result};
pub use report::{CompletionObserver, ConsoleReporter, JsonReporter, ProgressSink};
pub use runner::{
    ProgressUpdate, RunCanceller, RunHandle, RunId, RunOutcome, RunSpec, Runner, StepWork,
    TimedWork,
};

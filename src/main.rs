use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskcenter::config::{AppConfig, OutputFormat};
use taskcenter::report::{CompletionObserver, ConsoleReporter, JsonReporter, ProgressSink};
use taskcenter::runner::{RunOutcome, RunSpec, Runner, TimedWork};
use taskcenter::shutdown::cancel_on_shutdown;

#[derive(Parser)]
#[command(name = "taskcenter", about = "Runs background tasks with progress reporting")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of work steps per run (overrides config)
    #[arg(long)]
    steps: Option<u32>,

    /// Per-step work duration in milliseconds (overrides config)
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Run title (overrides config)
    #[arg(long)]
    title: Option<String>,

    /// Number of independent runs to start
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;

    // CLI flags override file/env configuration
    if let Some(steps) = cli.steps {
        config.run.steps = steps;
    }
    if let Some(delay) = cli.step_delay_ms {
        config.run.step_delay_ms = delay;
    }
    if let Some(title) = cli.title {
        config.run.title = title;
    }
    if let Some(format) = cli.output {
        config.output.format = format;
    }

    tracing::info!(
        steps = config.run.steps,
        step_delay_ms = config.run.step_delay_ms,
        runs = cli.runs,
        "Starting taskcenter"
    );

    let (sink, observer): (Arc<dyn ProgressSink>, Arc<dyn CompletionObserver>) =
        match config.output.format {
            OutputFormat::Text => {
                let reporter = Arc::new(ConsoleReporter::new(config.output.notify_on_completion));
                (Arc::clone(&reporter) as _, reporter as _)
            }
            OutputFormat::Json => {
                let reporter = Arc::new(JsonReporter::new());
                (Arc::clone(&reporter) as _, reporter as _)
            }
        };

    let work = Arc::new(TimedWork::new(Duration::from_millis(
        config.run.step_delay_ms,
    )));
    let runner = Runner::new(work, sink, observer);

    let mut handles = Vec::with_capacity(cli.runs as usize);
    for _ in 0..cli.runs.max(1) {
        let handle = runner.start(RunSpec::new(config.run.title.clone(), config.run.steps))?;
        handles.push(handle);
    }

    // A shutdown signal cancels every in-flight run; each still delivers
    // its outcome below.
    let cancellers = handles.iter().map(|h| h.canceller()).collect();
    tokio::spawn(cancel_on_shutdown(cancellers));

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.wait().await);
    }

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, RunOutcome::Failed { .. }))
        .count();
    let cancelled = outcomes
        .iter()
        .filter(|o| matches!(o, RunOutcome::Cancelled))
        .count();

    tracing::info!(
        total = outcomes.len(),
        failed,
        cancelled,
        "All runs finished"
    );

    if failed > 0 {
        std::process::exit(1);
    }
    if cancelled > 0 {
        std::process::exit(130);
    }
    Ok(())
}

use tokio::signal;

use crate::runner::RunCanceller;

/// Wait for a shutdown signal (SIGINT or SIGTERM).
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, requesting cancellation...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, requesting cancellation...");
        }
    }
}

/// Wait for a shutdown signal, then cancel every in-flight run.
///
/// Cancellation is cooperative: each run winds down at its next step
/// boundary and still delivers its outcome.
pub async fn cancel_on_shutdown(cancellers: Vec<RunCanceller>) {
    wait_for_shutdown().await;

    tracing::info!(count = cancellers.len(), "Cancelling in-flight runs");
    for canceller in cancellers {
        tracing::info!(run = %canceller.id(), "Requesting cancellation");
        canceller.cancel();
    }
}

//! Shutdown signal handling.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;

use crate::TRACING_TARGET_SHUTDOWN;

/// Resolves once the process is asked to stop.
///
/// Listens for Ctrl+C on every platform and additionally for SIGTERM on
/// Unix, which is how container runtimes stop the server. The timeout is
/// only logged here; axum enforces it on the in-flight requests.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                "Ctrl+C received, shutting down"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                "could not install Ctrl+C handler"
            ),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SHUTDOWN,
                    "SIGTERM received, shutting down"
                );
            }
            Err(error) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                "could not install SIGTERM handler"
            ),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        timeout_secs = shutdown_timeout.as_secs(),
        "draining in-flight requests"
    );
}

//! HTTP server startup and lifecycle management.
//!
//! Binds the configured address, serves the router, and coordinates
//! graceful shutdown on SIGTERM and Ctrl+C.

mod error;
mod shutdown;

use std::io;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
pub use crate::server::error::{ServerError, ServerResult};
use crate::server::shutdown::shutdown_signal;
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Serves the router until a shutdown signal arrives.
///
/// Validates the configuration, binds the listener, and hands the router
/// to axum with graceful shutdown wired up.
///
/// # Errors
///
/// Fails on invalid configuration, on an unbindable address, or when the
/// accept loop dies after startup.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = config.validate() {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::InvalidConfig(validation_error.to_string()));
    }

    let server_addr = config.server_addr();

    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => listener,
        Err(bind_error) => {
            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                error = %bind_error,
                "Failed to bind to address"
            );

            return Err(ServerError::bind(server_addr, bind_error));
        }
    };

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let started_at = Instant::now();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.shutdown_timeout()))
        .await;

    handle_result(result, started_at)
}

/// Handles the server result and logs the shutdown outcome.
fn handle_result(result: io::Result<()>, started_at: Instant) -> ServerResult<()> {
    let uptime = started_at.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Server shut down gracefully"
            );

            Ok(())
        }
        Err(serve_error) => {
            let error = ServerError::Runtime(serve_error);

            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                uptime_secs = uptime.as_secs(),
                "Server encountered a fatal error"
            );

            if let Some(suggestion) = error.suggestion() {
                tracing::info!(
                    target: TRACING_TARGET_SHUTDOWN,
                    suggestion = suggestion,
                    "Recovery suggestion"
                );
            }

            Err(error)
        }
    }
}

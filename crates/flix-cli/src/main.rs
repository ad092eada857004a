#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Command-line launcher for the flix HTTP API server.
//!
//! Loads configuration from CLI arguments, environment variables, and an
//! optional `.env` file, then serves the [`flix_server`] router over HTTP
//! with graceful shutdown on SIGTERM and Ctrl+C.

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use flix_server::service::ServiceState;

use crate::config::Cli;

// Tracing target constants

/// Tracing target for configuration loading events.
pub const TRACING_TARGET_CONFIG: &str = "flix_cli::config";

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "flix_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "flix_cli::server::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "server terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "server terminated with error"
        );
    } else {
        eprintln!("fatal: {error:#}");
    }

    process::exit(1);
}

/// Parses configuration, wires up the state, and serves until shutdown.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli).await?;
    let router = create_router(state);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
///
/// Derives the token signing keys, builds the password hasher, and
/// initializes the document store (loading seed data when configured).
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(&cli.service)
        .await
        .context("failed to initialize service state")
}

/// Builds the application router with all API routes attached.
fn create_router(state: ServiceState) -> Router {
    flix_server::handler::routes(state.clone()).with_state(state)
}

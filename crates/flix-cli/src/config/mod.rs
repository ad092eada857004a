//! Command-line and environment configuration.
//!
//! [`Cli`] flattens two groups: [`ServerConfig`] for the network binding
//! and shutdown behavior, and [`ServiceConfig`] for the signing secret,
//! hash costs, and document store. Every option is settable as a flag or
//! an environment variable, and a `.env` file is loaded before parsing so
//! its values act as defaults:
//!
//! ```bash
//! flix-cli --auth-secret "some-32-byte-or-longer-secret..." --port 8080
//! AUTH_SECRET="some-32-byte-or-longer-secret..." PORT=8080 flix-cli
//! ```

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use flix_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// The full set of options the binary accepts.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "flix")]
#[command(about = "Flix movie catalog API server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Token signing, password hashing, and document store configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` and then parses arguments.
    ///
    /// The order matters: clap reads `env` attributes at parse time, so the
    /// `.env` file has to be in the process environment first.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from a `.env` file when one exists.
    ///
    /// A missing file is not an error; anything else is reported on stderr
    /// because tracing is not initialized yet at this point.
    fn load_dotenv() {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            eprintln!("Warning: failed to load .env file: {error}");
        }
    }

    /// Installs the global tracing subscriber, honoring `RUST_LOG` when set
    /// and defaulting to `info` otherwise.
    pub fn init_tracing() {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer();

        tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;

        Ok(())
    }

    /// Logs configuration at startup (no sensitive values).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            token_ttl_secs = self.service.access_keys.access_token_ttl_secs,
            hash_memory_kib = self.service.password_hasher.hash_memory_kib,
            hash_iterations = self.service.password_hasher.hash_iterations,
            store_max_documents = self.service.store.store_max_documents,
            store_seed_path = ?self.service.store.store_seed_path,
            "Service configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "Build information"
        );
    }
}

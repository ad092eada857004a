//! Document store configuration.
//!
//! The module provides configuration options for the in-process document
//! store, with built-in validation and sensible defaults.

use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{StoreClient, StoreError, StoreResult, TRACING_TARGET_CLIENT};

/// Complete document store configuration.
///
/// The store keeps both collections in process memory, so the knobs here
/// bound memory use and optionally point at a seed file loaded at startup.
///
/// # Examples
///
/// ```rust,no_run
/// use flix_store::StoreConfig;
///
/// let config = StoreConfig::default();
/// let client = config.build()?;
/// # Ok::<(), flix_store::StoreError>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "store configurations must be used to create store clients"]
pub struct StoreConfig {
    /// Maximum number of documents held per collection
    #[cfg_attr(
        feature = "config",
        arg(
            long = "store-max-documents",
            env = "STORE_MAX_DOCUMENTS",
            default_value = "10000"
        )
    )]
    #[serde(default = "default_max_documents")]
    pub store_max_documents: u32,

    /// Path to a JSON file of seed movies loaded at startup (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "store-seed-path", env = "STORE_SEED_PATH")
    )]
    pub store_seed_path: Option<PathBuf>,
}

// Configuration constants
const MIN_DOCUMENTS: u32 = 16;
const MAX_DOCUMENTS: u32 = 1_000_000;

const DEFAULT_MAX_DOCUMENTS: u32 = 10_000;

fn default_max_documents() -> u32 {
    DEFAULT_MAX_DOCUMENTS
}

impl StoreConfig {
    /// Creates a new store configuration with default settings.
    pub fn new() -> Self {
        let this = Self {
            store_max_documents: DEFAULT_MAX_DOCUMENTS,
            store_seed_path: None,
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            max_documents = this.store_max_documents,
            seed_path = ?this.store_seed_path,
            "Created store configuration"
        );

        this
    }

    /// Sets the per-collection document cap.
    pub fn with_max_documents(mut self, max_documents: u32) -> Self {
        self.store_max_documents = max_documents;
        self
    }

    /// Sets the seed file path.
    pub fn with_seed_path(mut self, seed_path: impl Into<PathBuf>) -> Self {
        self.store_seed_path = Some(seed_path.into());
        self
    }

    /// Returns the per-collection document cap as a usize.
    #[inline]
    pub fn max_documents(&self) -> usize {
        self.store_max_documents as usize
    }

    /// Checks that the document cap and seed path are usable.
    pub fn validate(&self) -> StoreResult<()> {
        if !(MIN_DOCUMENTS..=MAX_DOCUMENTS).contains(&self.store_max_documents) {
            return Err(StoreError::Unexpected(
                format!(
                    "store_max_documents must be between {} and {}",
                    MIN_DOCUMENTS, MAX_DOCUMENTS
                )
                .into(),
            ));
        }

        if let Some(seed_path) = &self.store_seed_path
            && seed_path.as_os_str().is_empty()
        {
            return Err(StoreError::Unexpected(
                "store_seed_path must not be empty when set".into(),
            ));
        }

        Ok(())
    }

    /// Builds a new store client with this configuration.
    ///
    /// Validates the configuration for consistency and safety. Seed data is
    /// not loaded by this method; use [`StoreClient::new_with_seed`] for that.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub fn build(self) -> StoreResult<StoreClient> {
        tracing::debug!(target: TRACING_TARGET_CLIENT, "Validating store configuration");
        self.validate()?;
        tracing::debug!(target: TRACING_TARGET_CLIENT, "Store configuration validation passed");
        StoreClient::new(self)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_max_documents", &self.store_max_documents)
            .field("store_seed_path", &self.store_seed_path)
            .finish()
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StoreConfig(max_documents: {}, seed_path: {:?})",
            self.store_max_documents, self.store_seed_path
        )
    }
}

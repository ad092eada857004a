//! Document store client with seed-data management.
//!
//! This module provides a high-level interface for the in-process document
//! store used by the catalog server. It includes error handling, observability
//! through tracing, and validated configuration.

mod store_client;
mod store_config;

pub use store_client::{StoreClient, StoreStatus};
pub use store_config::StoreConfig;

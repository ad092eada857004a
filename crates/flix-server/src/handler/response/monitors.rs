//! Monitor response types.

use flix_store::StoreStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Service health status response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Moment the check ran.
    pub checked_at: Timestamp,
    /// Whether the service and its store are operational.
    pub is_healthy: bool,
    /// Number of stored users.
    pub users: usize,
    /// Number of stored movies.
    pub movies: usize,
    /// Server build version.
    pub version: String,
}

impl HealthStatus {
    pub fn from_status(status: StoreStatus) -> Self {
        Self {
            checked_at: Timestamp::now(),
            is_healthy: true,
            users: status.users,
            movies: status.movies,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

//! Authentication response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::handler::response::User;

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Profile of the authenticated user.
    pub user: User,
    /// The signed bearer token for subsequent requests.
    pub token: String,
    /// Moment the token was minted.
    pub issued_at: Timestamp,
    /// Moment the token stops being accepted.
    pub expires_at: Timestamp,
}

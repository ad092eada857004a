//! The authentication ladder.
//!
//! [`AuthHeader`] pulls the bearer token off the request, [`AccessClaims`]
//! verifies its signature and expiry, and [`AuthState`] confirms the subject
//! still exists in the store. Handlers pick the rung matching how much proof
//! they need; ownership checks live on [`AuthState`].

mod access_claims;
mod auth_header;
mod auth_state;

pub use self::access_claims::AccessClaims;
pub use self::auth_header::AuthHeader;
pub use self::auth_state::AuthState;

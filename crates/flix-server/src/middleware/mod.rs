//! Route-level guards applied in front of the handler stack: currently the
//! authentication requirement shared by all private routes.

mod auth;

pub use auth::require_authentication;

//! Middleware that gates whole route subtrees behind authentication.

mod require_auth;

pub use require_auth::require_authentication;

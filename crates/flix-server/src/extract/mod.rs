//! Request extractors used by every handler in the crate.
//!
//! Handlers never touch the raw axum extractors directly. The wrappers here
//! substitute for them one-for-one and reject bad input with the crate's
//! own [`Error`] payloads instead of axum's plain-text defaults.
//!
//! [`AuthHeader`], [`AccessClaims`] and [`AuthState`] form the
//! authentication ladder, each step verifying more than the last. [`Json`],
//! [`ValidateJson`] and [`Path`] cover request data.
//!
//! [`Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AccessClaims, AuthHeader, AuthState};
pub use crate::extract::reject::{Json, Path, ValidateJson};
pub use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION};

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! HTTP API server for the flix movie catalog.
//!
//! The server exposes a JSON REST API over the [`flix_store`] document store:
//! account registration and login, movie catalog queries, and per-user
//! favorite lists. All routes except registration, login, and the health
//! probe require a bearer access token issued by the login endpoint.

// Tracing target constants for consistent logging.

/// Tracing target for authentication operations including token validation.
pub const TRACING_TARGET_AUTHENTICATION: &str = "flix_server::authentication";

/// Tracing target for authorization checks including ownership verification.
pub const TRACING_TARGET_AUTHORIZATION: &str = "flix_server::authorization";

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-process document store for the flix movie catalog.
//!
//! This crate provides the persistence collaborator used by the HTTP layer:
//! typed models for the `users` and `movies` collections, repository traits
//! with find/create/update/delete-by-filter semantics, and a cloneable
//! [`StoreClient`] backed by per-collection read-write locks.

/// Tracing target for store lifecycle events: open, seed, status.
pub const TRACING_TARGET_CLIENT: &str = "flix_store::client";

/// Tracing target for reads and writes against the collections.
pub const TRACING_TARGET_QUERY: &str = "flix_store::queries";

mod client;
pub mod model;
pub mod query;

use std::borrow::Cow;

pub use crate::client::{StoreClient, StoreConfig, StoreStatus};

/// Unique-key constraints enforced by the document store.
///
/// Creates and updates that would duplicate one of these keys fail with
/// [`StoreError::UniqueViolation`] carrying the violated constraint, letting
/// callers map the conflict to a user-facing message without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueKey {
    /// `users.username` must be unique across all user documents.
    Username,
    /// `users.email` must be unique across all user documents.
    Email,
    /// `movies.title` must be unique across all movie documents.
    MovieTitle,
}

impl UniqueKey {
    /// Returns the document field backing this constraint.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::MovieTitle => "title",
        }
    }
}

/// What a store operation can fail with.
///
/// The in-process store has a much smaller failure surface than a networked
/// database, but callers are written against this enum so the store can be
/// swapped for an external one without touching the handler layer.
#[derive(Debug, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum StoreError {
    /// A write would duplicate a unique key.
    ///
    /// This covers both `create` calls and updates that rename a document
    /// onto an already-taken username, email, or title.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(&'static str),

    /// Anything the other variants do not cover, such as a poisoned lock.
    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl StoreError {
    /// Creates a unique-violation error for the given key.
    pub fn unique(key: UniqueKey) -> Self {
        Self::UniqueViolation(key.field())
    }

    /// The violated key, when this error is a unique-constraint violation.
    pub fn unique_violation(&self) -> Option<UniqueKey> {
        match self {
            Self::UniqueViolation("username") => Some(UniqueKey::Username),
            Self::UniqueViolation("email") => Some(UniqueKey::Email),
            Self::UniqueViolation("title") => Some(UniqueKey::MovieTitle),
            _ => None,
        }
    }

    /// True when a retry of the same operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unexpected(_))
    }

    /// True when retrying is pointless, as for constraint violations.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Result of a document store operation.
pub type StoreResult<T, E = StoreError> = Result<T, E>;

//! Document store error to HTTP error conversion handlers.
//!
//! This module converts [`StoreError`] values raised by the document store
//! into appropriate HTTP error responses. Unique-key violations become 409
//! responses naming the duplicated field; everything else is logged and
//! reported as an opaque 500.
//!
//! All conversions are implemented via the `From` trait for ergonomic usage.

use flix_store::{StoreError, UniqueKey};

use crate::handler::{Error, ErrorKind};

/// Tracing target for document store failures surfaced over HTTP.
const TRACING_TARGET: &str = "flix_server::store_errors";

impl From<UniqueKey> for Error<'static> {
    fn from(key: UniqueKey) -> Self {
        let (resource, message) = match key {
            UniqueKey::Username => ("users", "A user with this username already exists"),
            UniqueKey::Email => ("users", "A user with this email already exists"),
            UniqueKey::MovieTitle => ("movies", "A movie with this title already exists"),
        };

        ErrorKind::Conflict
            .with_message(message)
            .with_resource(resource)
            .with_context(key.field())
    }
}

impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation(field) => {
                if let Some(key) = error.unique_violation() {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        field = field,
                        "store write rejected (unique constraint)"
                    );
                    return key.into();
                }

                // Violation on a field without a known unique key.
                tracing::error!(
                    target: TRACING_TARGET,
                    field = field,
                    "unique violation on unmapped field"
                );
                ErrorKind::Conflict.into_error()
            }
            StoreError::Unexpected(reason) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    reason = %reason,
                    "unexpected store error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

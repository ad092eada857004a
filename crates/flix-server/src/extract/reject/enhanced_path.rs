//! Path parameter extractor that rejects with the handler error type.
//!
//! [`Path`] wraps [`axum::extract::Path`] so that unparsable parameters
//! come back as 422 validation errors with a format hint, not opaque 500s.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, OptionalFromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Path parameter extractor.
///
/// Routes capture usernames, movie titles, and UUIDs from the URL; when a
/// captured segment cannot deserialize into the handler's parameter type,
/// the rejection carries an [`InvalidInput`] error describing the expected
/// format instead of axum's default 500.
///
/// [`InvalidInput`]: ErrorKind::InvalidInput
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Wraps already-extracted path parameters.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Unwraps the inner parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(AxumPath(params)) => Ok(Self(params)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl<T, S> OptionalFromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let extracted =
            <AxumPath<T> as OptionalFromRequestParts<S>>::from_request_parts(parts, state).await;

        match extracted {
            Ok(params) => Ok(params.map(|AxumPath(inner)| Self(inner))),
            // Absent or unparsable parameters read as "not provided".
            Err(PathRejection::FailedToDeserializePathParams(_))
            | Err(PathRejection::MissingPathParams(_)) => Ok(None),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(source) => {
                let detail = source.to_string();
                ErrorKind::InvalidInput
                    .with_message("Path parameter has the wrong format")
                    .with_context(format!(
                        "could not parse path segment: {}. {}",
                        clip_source_message(&detail),
                        format_hint(&detail)
                    ))
            }
            PathRejection::MissingPathParams(source) => ErrorKind::InvalidInput
                .with_message("A required path parameter is missing")
                .with_context(format!(
                    "route expected a parameter that was not captured: {}",
                    clip_source_message(&source.to_string())
                )),
            other => ErrorKind::InternalServerError
                .with_message("Path could not be processed")
                .with_context(format!("unhandled path rejection: {other:?}")),
        }
    }
}

/// Picks a format hint from the deserializer's complaint.
fn format_hint(detail: &str) -> &'static str {
    let lowered = detail.to_lowercase();

    if lowered.contains("uuid") || lowered.contains("invalid character") {
        "Identifiers must be UUIDs, for example 550e8400-e29b-41d4-a716-446655440000"
    } else if lowered.contains("invalid digit") || lowered.contains("cannot parse") {
        "Numeric parameters accept digits only"
    } else {
        "Check the parameter against the route's expected types"
    }
}

/// Trims a deserializer message down to one clipped line for the response.
fn clip_source_message(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    first_line.chars().take(150).collect()
}

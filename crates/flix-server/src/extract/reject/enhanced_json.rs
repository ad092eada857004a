//! JSON body extractor that rejects with the handler error type.
//!
//! [`Json`] wraps [`axum::Json`] so that malformed bodies surface as
//! [`Error`] values with a useful `context` instead of axum's plain-text
//! rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Cap on accepted JSON bodies, quoted in oversize rejections (1 MiB).
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// JSON body extractor and response wrapper.
///
/// Extraction failures map onto the [`InvalidInput`] kind with a context
/// line describing what went wrong, so clients get a structured 422 rather
/// than axum's default rejection. As a response type it serializes exactly
/// like [`axum::Json`].
///
/// [`InvalidInput`]: ErrorKind::InvalidInput
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Wraps a value for JSON serialization.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <AxumJson<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl<T, S> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequest<S>>::from_request(req, state).await {
            Ok(json) => Ok(Some(json)),
            // An absent or unparsable body reads as "not provided"; only
            // server-side failures still abort the request.
            Err(error) if error.kind() == ErrorKind::InternalServerError => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(source) => ErrorKind::InvalidInput
                .with_message("Request body does not match the expected shape")
                .with_context(format!(
                    "deserialization failed: {}",
                    clip_source_message(&source.to_string())
                )),
            JsonRejection::JsonSyntaxError(source) => ErrorKind::InvalidInput
                .with_message("Request body is not well-formed JSON")
                .with_context(format!(
                    "parsing failed: {}",
                    clip_source_message(&source.to_string())
                )),
            JsonRejection::MissingJsonContentType(_) => ErrorKind::InvalidInput
                .with_message("Unsupported content type")
                .with_context("expected a Content-Type header of application/json"),
            JsonRejection::BytesRejection(source) => {
                let detail = source.to_string();
                if detail.contains("length limit") {
                    ErrorKind::InvalidInput
                        .with_message("Request body is too large")
                        .with_context(format!("bodies are capped at {BODY_LIMIT_BYTES} bytes"))
                } else {
                    ErrorKind::InvalidInput
                        .with_message("Request body could not be read")
                        .with_context(format!(
                            "body read failed: {}",
                            clip_source_message(&detail)
                        ))
                }
            }
            other => ErrorKind::InternalServerError
                .with_message("Request could not be processed")
                .with_context(format!("unhandled body rejection: {other:?}")),
        }
    }
}

/// Trims a deserializer message down to one clipped line for the response.
fn clip_source_message(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    first_line.chars().take(200).collect()
}

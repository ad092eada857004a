//! HTTP error type shared by every handler and extractor.
//!
//! [`ErrorKind`] enumerates the failure taxonomy of the API; [`Error`] wraps
//! a kind with optional per-occurrence details (message, resource, context)
//! added through builder methods. Serialization into the wire shape is
//! delegated to [`ErrorResponse`].

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// Failure taxonomy of the movie catalog API.
///
/// Every kind maps to exactly one HTTP status and one wire-level preset; the
/// four 401 kinds are kept distinct internally so logs can tell a missing
/// header from an expired token, while clients see the same status class.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The submitted username/password pair was rejected (400).
    InvalidCredentials,
    /// No `Authorization` header was presented (401).
    MissingAuthToken,
    /// The `Authorization` header could not be parsed as a bearer token (401).
    MalformedAuthToken,
    /// The token failed signature or expiry validation (401).
    Unauthorized,
    /// The token is valid but its subject no longer exists (401).
    StaleIdentity,
    /// The authenticated user does not own the addressed resource (403).
    Forbidden,
    /// The addressed resource does not exist (404).
    NotFound,
    /// The write conflicts with an existing document (409).
    Conflict,
    /// The request body or a path parameter failed validation (422).
    InvalidInput,
    /// Anything the taxonomy cannot express; details stay server-side (500).
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Wraps this kind into an [`Error`] without additional details.
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Shorthand for `Error::new(self).with_context(..)`.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Shorthand for `Error::new(self).with_message(..)`.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Shorthand for `Error::new(self).with_resource(..)`.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Returns the HTTP status this kind serializes with.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the wire-level preset for this kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::InvalidCredentials => ErrorResponse::INVALID_CREDENTIALS,
            Self::MissingAuthToken => ErrorResponse::MISSING_AUTH_TOKEN,
            Self::MalformedAuthToken => ErrorResponse::MALFORMED_AUTH_TOKEN,
            Self::Unauthorized => ErrorResponse::UNAUTHORIZED,
            Self::StaleIdentity => ErrorResponse::STALE_IDENTITY,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Conflict => ErrorResponse::CONFLICT,
            Self::InvalidInput => ErrorResponse::INVALID_INPUT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

/// An occurrence of a handler-level failure.
///
/// Carries an [`ErrorKind`] plus optional details attached where the error
/// arises: a client-facing `message`, the `resource` collection it concerns,
/// and debugging `context`. Details that are never set fall back to the
/// kind's preset on serialization.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates an error of the given kind with no details attached.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            resource: None,
            context: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches a client-facing message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the resource collection this error concerns.
    #[inline]
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches debugging context, appended to the response body.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the attached message, if any.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the attached resource, if any.
    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns the attached context, if any.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Detaches the error from its borrowed details.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            message: self.message.map(|v| Cow::Owned(v.into_owned())),
            resource: self.resource.map(|v| Cow::Owned(v.into_owned())),
            context: self.context.map(|v| Cow::Owned(v.into_owned())),
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preset = self.kind.response();

        let mut out = f.debug_struct("Error");
        out.field("kind", &self.kind)
            .field("name", &preset.name)
            .field("status", &preset.status)
            .field("message", &preset.message)
            .field("resource", &preset.resource);

        if let Some(ref message) = self.message {
            out.field("custom_message", message);
        }
        if let Some(ref resource) = self.resource {
            out.field("custom_resource", resource);
        }
        if let Some(ref context) = self.context {
            out.field("context", context);
        }

        out.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preset = self.kind.response();
        write!(
            f,
            "{} ({}): {}",
            preset.name,
            preset.status,
            self.message.as_deref().unwrap_or("Unknown error")
        )?;

        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }
        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {resource}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        // Start from the kind's preset, then layer on whatever details
        // were attached at the failure site.
        let mut response = self.kind.response();

        if let Some(message) = self.message {
            response = response.with_message(message);
        }
        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }
        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        response.into_response()
    }
}

/// A bare kind converts into an error that serializes as its preset.
impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// A specialized [`Result`] defaulting to the handler [`Error`].
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_error_is_internal() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        let _ = error.into_response();
    }

    #[test]
    fn builder_accessors_round_trip() {
        let error = ErrorKind::NotFound
            .with_message("Movie not found")
            .with_resource("movies")
            .with_context("title: Inception");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Movie not found"));
        assert_eq!(error.resource(), Some("movies"));
        assert_eq!(error.context(), Some("title: Inception"));
    }

    #[test]
    fn display_includes_all_details() {
        let error = ErrorKind::NotFound
            .with_message("Resource not found")
            .with_resource("movies")
            .with_context("ID: 123");

        let rendered = error.to_string();
        assert!(rendered.contains("not_found"));
        assert!(rendered.contains("404"));
        assert!(rendered.contains("Resource not found"));
        assert!(rendered.contains("ID: 123"));
        assert!(rendered.contains("movies"));
    }

    #[test]
    fn debug_includes_custom_details() {
        let error = ErrorKind::Forbidden
            .with_message("Access denied")
            .with_resource("users")
            .with_context("Token subject does not own the profile");

        let rendered = format!("{error:?}");
        assert!(rendered.contains("Forbidden"));
        assert!(rendered.contains("Access denied"));
        assert!(rendered.contains("users"));
    }

    #[test]
    fn implements_std_error() {
        let error = Error::new(ErrorKind::InvalidInput);
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn into_static_keeps_details() {
        let error = ErrorKind::NotFound
            .with_message(String::from("Test message"))
            .with_resource(String::from("test_resource"))
            .with_context(String::from("Test context"));

        let error = error.into_static();
        assert_eq!(error.message(), Some("Test message"));
        assert_eq!(error.resource(), Some("test_resource"));
        assert_eq!(error.context(), Some("Test context"));
    }

    #[test]
    fn every_kind_has_an_error_status() {
        let kinds = [
            ErrorKind::InvalidCredentials,
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::Unauthorized,
            ErrorKind::StaleIdentity,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::InvalidInput,
            ErrorKind::InternalServerError,
        ];

        for kind in kinds {
            let preset = kind.response();
            assert!(!preset.name.is_empty());
            assert!(preset.status.as_u16() >= 400);
            let _ = kind.into_response();
        }
    }

    #[test]
    fn auth_failures_map_to_unauthorized_status() {
        let kinds = [
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::Unauthorized,
            ErrorKind::StaleIdentity,
        ];

        for kind in kinds {
            assert_eq!(kind.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}

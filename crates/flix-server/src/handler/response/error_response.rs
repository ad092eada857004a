use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wire shape of every error the API returns.
///
/// A response starts from one of the const presets below and optionally
/// accumulates a `resource` and extra `message`/`context` detail on its way
/// out. The HTTP status rides along unserialized; clients read it from the
/// response line.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Stable machine-readable error name.
    pub name: Cow<'a, str>,
    /// Human-readable summary, safe to show to clients.
    pub message: Cow<'a, str>,
    /// Collection the error concerns, when a handler names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Debugging detail appended by extractors and handlers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    /// Status the response is sent with, never part of the JSON body.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const INVALID_CREDENTIALS: Self = Self::new(
        "invalid_credentials",
        "The username or password is incorrect",
        StatusCode::BAD_REQUEST,
    );
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "Authentication is required to access this resource",
        StatusCode::UNAUTHORIZED,
    );
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new(
        "malformed_auth_token",
        "The authentication token format is invalid",
        StatusCode::UNAUTHORIZED,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "Invalid or expired authentication credentials",
        StatusCode::UNAUTHORIZED,
    );
    pub const STALE_IDENTITY: Self = Self::new(
        "stale_identity",
        "The account referenced by this token no longer exists",
        StatusCode::UNAUTHORIZED,
    );
    pub const FORBIDDEN: Self = Self::new(
        "forbidden",
        "You don't have permission to access this resource",
        StatusCode::FORBIDDEN,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const CONFLICT: Self = Self::new(
        "conflict",
        "The request conflicts with the current state of the resource",
        StatusCode::CONFLICT,
    );
    pub const INVALID_INPUT: Self = Self::new(
        "invalid_input",
        "One or more request fields failed validation",
        StatusCode::UNPROCESSABLE_ENTITY,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Builds a preset from its name, default message, and status.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Names the resource this error concerns.
    ///
    /// Nested resources chain with a slash, so a favorites failure can
    /// report `users/favorites`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let appended = resource.into();
        self.resource = Some(match self.resource.take() {
            Some(existing) => Cow::Owned(format!("{existing}/{appended}")),
            None => appended,
        });
        self
    }

    /// Appends detail to the client-facing message, sentence by sentence.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let appended = message.into();
        self.message = Cow::Owned(format!("{}. {appended}", self.message));
        self
    }

    /// Appends debugging context; earlier context is kept, separated by `;`.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let appended = context.into();
        self.context = Some(match self.context.take() {
            Some(existing) => Cow::Owned(format!("{existing}; {appended}")),
            None => appended,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    /// Falls back to the 500 preset.
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        // The status rides on the response line; the body never repeats it.
        (self.status, Json(self)).into_response()
    }
}

//! Bearer-token handling for the `Authorization` header.
//!
//! [`AuthHeader`] works in both directions: extracting it from a request
//! parses and verifies the bearer token, and returning it from a handler
//! signs the claims and sets the header on the response. The login handler
//! uses the response direction to hand the fresh token back.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::auth::AccessClaims;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AccessKeys;

/// Verified claims paired with the keys that verified them.
///
/// Extraction checks the token's signature, expiry, and required claims
/// (`sub`, `iat`, `exp`) but deliberately stops short of a store lookup;
/// [`AuthState`] layers that on top for handlers that need a live account.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    access_claims: AccessClaims,
    access_keys: AccessKeys,
}

impl AuthHeader {
    /// Pairs claims with the keys that sign or verified them.
    #[inline]
    pub const fn new(claims: AccessClaims, keys: AccessKeys) -> Self {
        Self {
            access_claims: claims,
            access_keys: keys,
        }
    }

    /// Borrows the verified claims.
    #[inline]
    pub const fn as_access_claims(&self) -> &AccessClaims {
        &self.access_claims
    }

    /// Takes the verified claims out of the header.
    #[inline]
    pub fn into_access_claims(self) -> AccessClaims {
        self.access_claims
    }

    /// Verifies a parsed bearer header into claims.
    fn from_bearer(
        bearer: TypedHeader<Authorization<Bearer>>,
        access_keys: AccessKeys,
    ) -> Result<Self> {
        let access_claims = AccessClaims::from_token(bearer.token(), &access_keys)?;
        Ok(Self::new(access_claims, access_keys))
    }

    /// Signs the claims and renders them as a typed `Authorization` header.
    fn into_bearer(self) -> Result<TypedHeader<Authorization<Bearer>>> {
        let token = self.access_claims.to_token(&self.access_keys)?;

        let bearer = Authorization::bearer(&token).map_err(|_| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %self.access_claims.user_id,
                "signed token is not a valid header value"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication header creation failed")
                .with_context("signed token is not a valid header value")
        })?;

        Ok(TypedHeader(bearer))
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    AccessKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A middleware run earlier in the stack may have verified already.
        if let Some(verified) = parts.extensions.get::<Self>() {
            return Ok(verified.clone());
        }

        type BearerHeader = TypedHeader<Authorization<Bearer>>;
        let access_keys = AccessKeys::from_ref(state);

        match BearerHeader::from_request_parts(parts, state).await {
            Ok(bearer) => {
                let verified = Self::from_bearer(bearer, access_keys)?;
                parts.extensions.insert(verified.clone());
                Ok(verified)
            }
            Err(rejection) => Err(match rejection.reason() {
                TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                    .with_message("Authentication required")
                    .with_context("no Authorization header on the request")
                    .with_resource("authentication"),
                TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                    .with_message("Invalid token format")
                    .with_context("the Authorization header must carry a bearer token")
                    .with_resource("authentication"),
                _ => ErrorKind::InternalServerError
                    .with_message("Authentication processing failed")
                    .with_context("unhandled Authorization header rejection")
                    .with_resource("authentication"),
            }),
        }
    }
}

impl IntoResponseParts for AuthHeader {
    type Error = Error<'static>;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        // .into_response_parts() for a TypedHeader is infallible
        self.into_bearer()
            .map(|h| h.into_response_parts(res).unwrap())
    }
}

impl IntoResponse for AuthHeader {
    fn into_response(self) -> Response {
        match self.into_bearer() {
            Ok(header) => header.into_response(),
            Err(error) => error.into_response(),
        }
    }
}

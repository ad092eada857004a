//! JWT claims carried by access tokens.
//!
//! This module defines the claims embedded in every issued access token and
//! the signing and verification paths that turn claims into compact JWT
//! strings and back. Tokens are signed with HMAC-SHA256 using the keys
//! managed by [`AccessKeys`].

use jiff::{Span, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, Header, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AccessKeys;

/// Registered JWT claims issued at login.
///
/// The payload stays minimal: `sub` carries the user's UUID, `iat` and
/// `exp` bound the token's validity window. Timestamps serialize as integer
/// Unix seconds so the decoder can enforce expiration without any custom
/// claim handling.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject ID (unique identifier of the associated user).
    #[serde(rename = "sub")]
    pub user_id: Uuid,

    /// Issued at (as Unix seconds).
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time (as Unix seconds).
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AccessClaims {
    /// Remaining lifetime below which a token is considered about to expire.
    const SOON_THRESHOLD_SECS: i64 = 300;

    /// Creates claims for a user, valid from now for `token_ttl`.
    pub fn new(user_id: Uuid, token_ttl: Span) -> Self {
        let issued_at = Timestamp::now();
        let expires_at = issued_at.checked_add(token_ttl).unwrap_or(Timestamp::MAX);

        Self {
            user_id,
            issued_at,
            expires_at,
        }
    }

    /// True once the expiration instant has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// True when less than the refresh threshold of lifetime remains.
    #[inline]
    #[must_use]
    pub fn expires_soon(&self) -> bool {
        self.remaining_lifetime().get_seconds() < Self::SOON_THRESHOLD_SECS
    }

    /// Time left until expiration, clamped at zero for expired tokens.
    #[inline]
    #[must_use]
    pub fn remaining_lifetime(&self) -> Span {
        let remaining = self.expires_at - Timestamp::now();
        if remaining.is_negative() {
            Span::new()
        } else {
            remaining
        }
    }

    /// Signs the claims into a compact JWT string.
    ///
    /// # Errors
    ///
    /// Signing failures surface as internal server errors; the claims
    /// themselves cannot be invalid at this point.
    pub fn to_token(&self, access_keys: &AccessKeys) -> Result<String> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, self, access_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                user_id = %self.user_id,
                "Failed to encode access token"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_context("Unable to create access token")
        })
    }

    /// Verifies a compact JWT string back into claims.
    ///
    /// Verification covers the HMAC-SHA256 signature, the presence of the
    /// `sub`, `iat`, and `exp` claims, and expiration.
    ///
    /// # Errors
    ///
    /// Undecodable tokens map onto the malformed and unauthorized kinds
    /// depending on what the decoder rejected; an expired token is always
    /// `Unauthorized`.
    pub fn from_token(auth_token: &str, access_keys: &AccessKeys) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            "verifying access token"
        );

        let token_data = decode::<Self>(
            auth_token,
            access_keys.decoding_key(),
            access_keys.validation(),
        )?;
        let claims = token_data.claims;

        // Decoding applies leeway to `exp`, so re-check the exact expiration.
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %claims.user_id,
                expired_at = %claims.expires_at,
                "rejected expired access token"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Authentication session has expired")
                .with_context("Please sign in again to continue"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %claims.user_id,
            expires_soon = claims.expires_soon(),
            remaining = ?claims.remaining_lifetime(),
            "access token verified"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is invalid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Authentication token uses unsupported format")
                .with_context("Token was signed with an incompatible algorithm"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("Token is missing required field: {}", claim)),
            JwtErrorKind::Base64(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token format is corrupted")
                .with_context("Token contains invalid base64 encoding"),
            JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token structure is invalid")
                .with_context("Token payload contains malformed data"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";
    const OTHER_SECRET: &str = "fedcba9876543210fedcba9876543210";

    fn test_keys() -> AccessKeys {
        AccessKeys::new(TEST_SECRET).unwrap()
    }

    #[test]
    fn claims_round_trip_through_token() -> anyhow::Result<()> {
        let keys = test_keys();
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(user_id, keys.token_ttl());

        let token = claims.to_token(&keys)?;
        let decoded = AccessClaims::from_token(&token, &keys)?;

        assert_eq!(decoded.user_id, user_id);
        assert_eq!(decoded.issued_at.as_second(), claims.issued_at.as_second());
        assert_eq!(
            decoded.expires_at.as_second(),
            claims.expires_at.as_second()
        );

        Ok(())
    }

    #[test]
    fn verification_is_repeatable() -> anyhow::Result<()> {
        let keys = test_keys();
        let claims = AccessClaims::new(Uuid::new_v4(), keys.token_ttl());
        let token = claims.to_token(&keys)?;

        let first = AccessClaims::from_token(&token, &keys)?;
        let second = AccessClaims::from_token(&token, &keys)?;
        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> anyhow::Result<()> {
        let keys = test_keys();
        let other_keys = AccessKeys::new(OTHER_SECRET)?;

        let claims = AccessClaims::new(Uuid::new_v4(), other_keys.token_ttl());
        let token = claims.to_token(&other_keys)?;

        let error = AccessClaims::from_token(&token, &keys)
            .expect_err("token signed with a different secret must be rejected");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let keys = test_keys();

        // Expired well past any decoding leeway.
        let now = Timestamp::now();
        let claims = AccessClaims {
            user_id: Uuid::new_v4(),
            issued_at: now - Span::new().hours(2),
            expires_at: now - Span::new().hours(1),
        };
        let token = claims.to_token(&keys)?;

        let error = AccessClaims::from_token(&token, &keys)
            .expect_err("expired token must be rejected");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn garbage_token_is_malformed() {
        let keys = test_keys();

        let error = AccessClaims::from_token("not-a-jwt", &keys)
            .expect_err("unparseable token must be rejected");
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
    }

    #[test]
    fn fresh_claims_are_not_expired() {
        let keys = test_keys();
        let claims = AccessClaims::new(Uuid::new_v4(), keys.token_ttl());

        assert!(!claims.is_expired());
        assert!(!claims.expires_soon());
        assert!(claims.remaining_lifetime().get_seconds() > 0);
    }
}

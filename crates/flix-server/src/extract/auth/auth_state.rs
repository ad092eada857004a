//! Fully-verified authentication state.
//!
//! [`AuthState`] goes one step beyond [`AuthHeader`]: after the token
//! checks out cryptographically, it looks the subject up in the document
//! store. Tokens outlive account deletion, so that lookup is what turns a
//! still-valid token for a deleted account into a rejection.
//!
//! Handlers take `AuthState` to require authentication or
//! `Option<AuthState>` to merely observe it:
//!
//! ```rust,ignore
//! use flix_server::extract::AuthState;
//!
//! async fn update_profile(auth_state: AuthState) -> Result<impl IntoResponse> {
//!     let user_id = auth_state.user_id;
//!     // ...
//! }
//!
//! async fn health(auth_state: Option<AuthState>) -> impl IntoResponse {
//!     let authenticated = auth_state.is_some();
//!     // ...
//! }
//! ```

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use flix_store::StoreClient;
use flix_store::model::User;
use flix_store::query::UserRepository;

use super::{AccessClaims, AuthHeader};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AccessKeys;
use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION};

/// Claims whose subject is known to still exist.
///
/// The primary authentication extractor. A successful extraction means the
/// token verified cryptographically, is unexpired, and names an account
/// that is still in the store. Each 401 kind is distinct: a missing header
/// is [`MissingAuthToken`], an unparsable one [`MalformedAuthToken`], a bad
/// or expired signature [`Unauthorized`], and a deleted subject
/// [`StaleIdentity`]. The store lookup runs once per request; repeated
/// extractions reuse the cached result.
///
/// [`MissingAuthToken`]: ErrorKind::MissingAuthToken
/// [`MalformedAuthToken`]: ErrorKind::MalformedAuthToken
/// [`Unauthorized`]: ErrorKind::Unauthorized
/// [`StaleIdentity`]: ErrorKind::StaleIdentity
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AccessClaims);

impl AuthState {
    /// Wraps claims that already passed the store lookup.
    ///
    /// Only [`Self::from_unverified_header`] and tests should call this;
    /// wrapping unchecked claims would skip the existence check.
    #[inline]
    #[must_use]
    pub const fn from_verified_claims(access_claims: AccessClaims) -> Self {
        Self(access_claims)
    }

    /// Confirms the token's subject against the store.
    ///
    /// The header extraction already verified the token itself; this step
    /// rejects tokens whose account has since been deleted.
    ///
    /// # Errors
    ///
    /// A deleted subject comes back as [`StaleIdentity`], a failed store
    /// query as an internal server error.
    ///
    /// [`StaleIdentity`]: ErrorKind::StaleIdentity
    pub async fn from_unverified_header(
        auth_header: AuthHeader,
        store: StoreClient,
    ) -> Result<Self> {
        let access_claims = auth_header.into_access_claims();

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %access_claims.user_id,
            expires_at = %access_claims.expires_at,
            "checking token subject against the store"
        );

        let user = store
            .find_user_by_id(access_claims.user_id)
            .await
            .map_err(|store_error| {
                tracing::error!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %store_error,
                    user_id = %access_claims.user_id,
                    "subject lookup failed"
                );
                ErrorKind::InternalServerError
                    .with_message("Authentication verification encountered an error")
                    .with_context("Unable to validate account credentials")
            })?;

        let Some(user) = user else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %access_claims.user_id,
                "token subject no longer exists"
            );
            return Err(ErrorKind::StaleIdentity.with_resource("authentication"));
        };

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %user.id,
            username = %user.username,
            "authentication complete"
        );

        Ok(Self::from_verified_claims(access_claims))
    }

    /// Rejects the request unless the token subject owns `user`.
    ///
    /// Self-service routes let users modify only their own account; this
    /// is the single place that rule is enforced.
    ///
    /// # Errors
    ///
    /// Returns [`Forbidden`] when the subject and the addressed document
    /// differ.
    ///
    /// [`Forbidden`]: ErrorKind::Forbidden
    pub fn authorize_owner(&self, user: &User) -> Result<()> {
        if self.user_id != user.id {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                authenticated_user_id = %self.user_id,
                target_user_id = %user.id,
                target_username = %user.username,
                "denied access to another user's account"
            );
            return Err(ErrorKind::Forbidden
                .with_message("You can only manage your own account")
                .with_context("This resource belongs to a different user")
                .with_resource("users"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = %self.user_id,
            username = %user.username,
            "ownership confirmed"
        );

        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send + 'static,
    StoreClient: FromRef<S>,
    AccessKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // The middleware layer extracts first; handlers reuse its result
        // instead of hitting the store again.
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let store = StoreClient::from_ref(state);
        let auth_state = Self::from_unverified_header(auth_header, store).await?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send + 'static,
    StoreClient: FromRef<S>,
    AccessKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        // Any authentication failure reads as "anonymous" here.
        let attempt = <Self as FromRequestParts<S>>::from_request_parts(parts, state).await;
        Ok(attempt.ok())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Span, Timestamp};
    use uuid::Uuid;

    use super::*;

    fn sample_user(id: Uuid, username: &str) -> User {
        User {
            id,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".to_owned(),
            birthday: None,
            favorite_movies: Vec::new(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn owner_passes_ownership_check() {
        let user = sample_user(Uuid::new_v4(), "moviegoer");
        let claims = AccessClaims::new(user.id, Span::new().seconds(3600));
        let auth_state = AuthState::from_verified_claims(claims);

        assert!(auth_state.authorize_owner(&user).is_ok());
    }

    #[test]
    fn other_user_fails_ownership_check() {
        let user = sample_user(Uuid::new_v4(), "moviegoer");
        let claims = AccessClaims::new(Uuid::new_v4(), Span::new().seconds(3600));
        let auth_state = AuthState::from_verified_claims(claims);

        let error = auth_state
            .authorize_owner(&user)
            .expect_err("foreign account must be rejected");
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }
}

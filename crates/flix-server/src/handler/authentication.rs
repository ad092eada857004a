//! Authentication handlers for user login.
//!
//! This module provides the credential-based login endpoint that exchanges a
//! username/password pair for a signed bearer access token. Login failures
//! are deliberately uniform: an unknown username and a wrong password produce
//! the same response, and the missing-user path burns a dummy hash
//! verification so both failures cost the same amount of time.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use flix_store::StoreClient;
use flix_store::query::UserRepository;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::response::{AuthSession, User};
use crate::extract::{AccessClaims, AuthHeader, Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{AccessKeys, PasswordHasher, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "flix_server::handler::authentication";

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    /// Login handle of the user.
    #[validate(length(min = 1))]
    pub username: String,
    /// Password of the user.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Verifies credentials and issues a new access token.
#[tracing::instrument(skip_all)]
async fn login(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    State(access_keys): State<AccessKeys>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(StatusCode, AuthHeader, Json<AuthSession>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username,
        "login attempt"
    );

    let user = store.find_user_by_username(&request.username).await?;
    let user_exists = user.is_some();

    // Always perform one hash verification so the unknown-username path and
    // the wrong-password path are indistinguishable by timing.
    let password_valid = match &user {
        Some(user) => password_hasher
            .verify_password(&request.password, &user.password_hash)
            .is_ok(),
        None => password_hasher.verify_dummy_password(&request.password),
    };

    let Some(user) = user.filter(|_| password_valid) else {
        tracing::warn!(
            target: TRACING_TARGET,
            username = %request.username,
            user_exists = user_exists,
            password_valid = password_valid,
            "login failed"
        );
        return Err(ErrorKind::InvalidCredentials.with_resource("authentication"));
    };

    let access_claims = AccessClaims::new(user.id, access_keys.token_ttl());
    let token = access_claims.to_token(&access_keys)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %access_claims.user_id,
        username = %user.username,
        expires_at = %access_claims.expires_at,
        "login successful: access token issued"
    );

    let session = AuthSession {
        user: User::from_model(user),
        token,
        issued_at: access_claims.issued_at,
        expires_at: access_claims.expires_at,
    };

    let auth_header = AuthHeader::new(access_claims, access_keys);
    Ok((StatusCode::OK, auth_header, Json(session)))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use crate::handler::response::AuthSession;
    use crate::handler::test::{register_and_login, register_payload, test_server};

    #[tokio::test]
    async fn login_returns_session_with_token() -> anyhow::Result<()> {
        let server = test_server().await?;

        let response = server
            .post("/users")
            .json(&register_payload("loginuser", "Secret123!"))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "loginuser",
                "password": "Secret123!",
            }))
            .await;
        response.assert_status_ok();

        let session: AuthSession = response.json();
        assert_eq!(session.user.username, "loginuser");
        assert!(!session.token.is_empty());
        assert!(session.expires_at > session.issued_at);

        // The token is also echoed as a response header.
        assert!(response.headers().contains_key("authorization"));

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() -> anyhow::Result<()> {
        let server = test_server().await?;

        server
            .post("/users")
            .json(&register_payload("wrongpass", "Correct123!"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "wrongpass",
                "password": "Incorrect456!",
            }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn login_with_unknown_username_is_rejected() -> anyhow::Result<()> {
        let server = test_server().await?;

        let response = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "nobodyhome",
                "password": "Whatever123!",
            }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn login_failures_share_one_shape() -> anyhow::Result<()> {
        let server = test_server().await?;

        server
            .post("/users")
            .json(&register_payload("shapeuser", "Correct123!"))
            .await
            .assert_status(StatusCode::CREATED);

        let wrong_password = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "shapeuser",
                "password": "Incorrect456!",
            }))
            .await;
        let unknown_user = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "missinguser",
                "password": "Incorrect456!",
            }))
            .await;

        wrong_password.assert_status_bad_request();
        unknown_user.assert_status_bad_request();

        // Neither the status nor the body may reveal whether the username exists.
        let wrong_password: serde_json::Value = wrong_password.json();
        let unknown_user: serde_json::Value = unknown_user.json();
        assert_eq!(wrong_password, unknown_user);

        Ok(())
    }

    #[tokio::test]
    async fn login_with_empty_password_is_invalid_input() -> anyhow::Result<()> {
        let server = test_server().await?;

        let response = server
            .post("/login")
            .json(&serde_json::json!({
                "username": "loginuser",
                "password": "",
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        Ok(())
    }

    #[tokio::test]
    async fn issued_token_opens_protected_routes() -> anyhow::Result<()> {
        let server = test_server().await?;
        let token = register_and_login(&server, "tokenuser", "Secret123!").await?;

        let response = server.get("/movies").authorization_bearer(&token).await;
        response.assert_status_ok();

        Ok(())
    }
}

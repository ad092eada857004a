//! The complete route table, assembled from one sub-router per resource.
//!
//! [`routes`] is the only entry point; it splits the table into a private
//! half behind the authentication middleware and a public half that serves
//! registration, login, and monitoring without a token.
//!
//! ```rust,no_run
//! use flix_server::handler;
//! use flix_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let router: axum::Router = handler::routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```

mod authentication;
mod error;
mod monitors;
mod movies;
mod request;
mod response;
mod users;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes guarded by the authentication
/// middleware.
fn private_routes() -> Router<ServiceState> {
    Router::new().merge(users::routes()).merge(movies::routes())
}

/// Returns a [`Router`] with all publicly reachable routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(users::public_routes())
        .merge(monitors::routes())
}

/// Returns a [`Router`] with all routes.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    // Private routes reject the request before the handler runs; public
    // routes stay reachable without a token.
    let private_router = private_routes().route_layer(require_authentication);
    let public_router = public_routes();

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::handler::response::AuthSession;
    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    /// Boots a [`TestServer`] around an already-built [`ServiceState`].
    pub async fn test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let app = routes(state.clone()).with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Boots a [`TestServer`] on the default configuration.
    pub async fn test_server() -> anyhow::Result<TestServer> {
        let config = ServiceConfig::default();
        let state = ServiceState::from_config(&config).await?;
        test_server_with_state(state).await
    }

    /// Builds a registration payload for `username` with a matching email.
    pub fn register_payload(username: &str, password: &str) -> serde_json::Value {
        serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
        })
    }

    /// Builds a catalog payload for a movie titled `title`.
    pub fn movie_payload(title: &str) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "year": 2010,
            "description": "A thief steals corporate secrets through dream-sharing technology.",
            "genres": ["Sci-Fi", "Thriller"],
            "director": {
                "name": "Christopher Nolan",
                "bio": "British-American director of large-scale cerebral films.",
                "birthYear": 1970,
            },
            "actors": ["Leonardo DiCaprio", "Elliot Page"],
        })
    }

    /// Registers a user and logs them in, returning the issued bearer token.
    pub async fn register_and_login(
        server: &TestServer,
        username: &str,
        password: &str,
    ) -> anyhow::Result<String> {
        let response = server
            .post("/users")
            .json(&register_payload(username, password))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .await;
        response.assert_status_ok();

        let session: AuthSession = response.json();
        Ok(session.token)
    }

    #[tokio::test]
    async fn router_boots() -> anyhow::Result<()> {
        let server = test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = test_server().await?;

        let response = server.get("/nonexistent").await;
        response.assert_status_not_found();

        Ok(())
    }

    #[tokio::test]
    async fn end_to_end_account_flow() -> anyhow::Result<()> {
        let server = test_server().await?;

        // Register and log in.
        let alice_token = register_and_login(&server, "alice", "Wonder123!").await?;

        // The token opens protected routes; its absence does not.
        server
            .get("/users/alice")
            .authorization_bearer(&alice_token)
            .await
            .assert_status_ok();
        server.get("/users/alice").await.assert_status_unauthorized();

        // A different user's token cannot modify alice's profile.
        let bob_token = register_and_login(&server, "bobby", "Builder123!").await?;
        server
            .put("/users/alice")
            .authorization_bearer(&bob_token)
            .json(&serde_json::json!({ "email": "stolen@example.com" }))
            .await
            .assert_status_forbidden();

        Ok(())
    }
}

//! System health monitoring handlers.
//!
//! The health probe is public so load balancers and uptime checks can reach
//! it without credentials; a token is accepted but never required.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use flix_store::StoreClient;

use super::response::HealthStatus;
use crate::extract::{AuthState, Json};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "flix_server::handler::monitors";

/// Reports service liveness and store collection sizes.
#[tracing::instrument(skip_all, fields(authenticated = auth_state.is_some()))]
async fn health_status(
    State(store): State<StoreClient>,
    auth_state: Option<AuthState>,
) -> Result<(StatusCode, Json<HealthStatus>)> {
    let status = store.status().await;

    tracing::debug!(
        target: TRACING_TARGET,
        authenticated = auth_state.is_some(),
        users = status.users,
        movies = status.movies,
        "health status requested"
    );

    Ok((StatusCode::OK, Json(HealthStatus::from_status(status))))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

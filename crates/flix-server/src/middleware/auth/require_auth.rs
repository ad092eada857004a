use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;

/// Gates a route subtree behind full authentication.
///
/// Extracting [`AuthState`] is the whole check: it verifies the bearer
/// token and confirms the account still exists, rejecting with the
/// matching 401 before the inner handler runs. Handlers behind this layer
/// can extract [`AuthState`] again for free, since the verified state is
/// cached on the request.
///
/// ```rust,no_run
/// use axum::extract::Request;
/// use axum::middleware::{FromFnLayer, from_fn_with_state};
/// use flix_server::extract::AuthState;
/// use flix_server::middleware::require_authentication;
/// use flix_server::service::{ServiceConfig, ServiceState};
///
/// # async fn example() -> flix_server::Result<()> {
/// let state = ServiceState::from_config(&ServiceConfig::default()).await?;
/// let _guard: FromFnLayer<_, _, (AuthState, Request)> =
///     from_fn_with_state(state, require_authentication);
/// # Ok(())
/// # }
/// ```
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

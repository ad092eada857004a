//! User management handlers for registration, profiles, and favorites.
//!
//! Registration is the only public operation here; every other route sits
//! behind the authentication middleware. Profile updates, deletion, and
//! favorite-list mutations are additionally ownership-checked: the token
//! subject must be the user addressed by the path.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use flix_store::StoreClient;
use flix_store::query::{MovieRepository, UserRepository};
use uuid::Uuid;

use super::request::{CreateUser, UpdateUser};
use super::response::User;
use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for user operations.
const TRACING_TARGET: &str = "flix_server::handler::users";

/// Builds the not-found error shared by all user lookups.
fn user_not_found(username: &str) -> Error<'static> {
    ErrorKind::NotFound
        .with_resource("users")
        .with_message("User not found")
        .with_context(format!("Username: {username}"))
}

/// Registers a new user.
#[tracing::instrument(skip_all)]
async fn register_user(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username,
        "registering user"
    );

    let password_hash = password_hasher.hash_password(&request.password)?;
    let user = store.create_user(request.into_model(password_hash)).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    Ok((StatusCode::CREATED, Json(User::from_model(user))))
}

/// Lists all registered users.
#[tracing::instrument(skip_all)]
async fn list_users(State(store): State<StoreClient>) -> Result<(StatusCode, Json<Vec<User>>)> {
    let users = store.list_users().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = users.len(),
        "users listed"
    );

    let users = users.into_iter().map(User::from_model).collect();
    Ok((StatusCode::OK, Json(users)))
}

/// Retrieves a user by username.
#[tracing::instrument(skip_all)]
async fn find_user(
    State(store): State<StoreClient>,
    Path(username): Path<String>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %username,
        "retrieving user"
    );

    let Some(user) = store.find_user_by_username(&username).await? else {
        return Err(user_not_found(&username));
    };

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Updates a user profile.
///
/// Only the profile owner may update it. A supplied password is re-hashed
/// before it is persisted; the plaintext never reaches the store.
#[tracing::instrument(skip_all)]
async fn update_user(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    auth_state: AuthState,
    Path(username): Path<String>,
    ValidateJson(request): ValidateJson<UpdateUser>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %username,
        has_username = request.username.is_some(),
        has_email = request.email.is_some(),
        has_password = request.password.is_some(),
        "updating user"
    );

    let Some(target) = store.find_user_by_username(&username).await? else {
        return Err(user_not_found(&username));
    };
    auth_state.authorize_owner(&target)?;

    let password_hash = match &request.password {
        Some(password) => Some(password_hasher.hash_password(password)?),
        None => None,
    };

    let updates = request.into_model(password_hash);
    let Some(user) = store.update_user(&target.username, updates).await? else {
        // The document vanished between the ownership check and the write.
        return Err(user_not_found(&username));
    };

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        username = %user.username,
        "user updated"
    );

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Deletes a user.
///
/// Only the profile owner may delete it. Access tokens already issued for
/// the deleted user stop working on their next request.
#[tracing::instrument(skip_all)]
async fn delete_user(
    State(store): State<StoreClient>,
    auth_state: AuthState,
    Path(username): Path<String>,
) -> Result<StatusCode> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %username,
        "deleting user"
    );

    let Some(target) = store.find_user_by_username(&username).await? else {
        return Err(user_not_found(&username));
    };
    auth_state.authorize_owner(&target)?;

    if store.delete_user(&target.username).await?.is_none() {
        tracing::warn!(
            target: TRACING_TARGET,
            username = %username,
            "user was already deleted"
        );
    }

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %target.id,
        username = %username,
        "user deleted"
    );

    Ok(StatusCode::OK)
}

/// Adds a movie to a user's favorites.
///
/// Favoriting an already-favorited movie is a no-op success; the list never
/// holds duplicates.
#[tracing::instrument(skip_all)]
async fn add_favorite_movie(
    State(store): State<StoreClient>,
    auth_state: AuthState,
    Path((username, movie_id)): Path<(String, Uuid)>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %username,
        movie_id = %movie_id,
        "adding favorite movie"
    );

    let Some(target) = store.find_user_by_username(&username).await? else {
        return Err(user_not_found(&username));
    };
    auth_state.authorize_owner(&target)?;

    if !store.movie_exists(movie_id).await? {
        return Err(ErrorKind::NotFound
            .with_resource("movies")
            .with_message("Movie not found")
            .with_context(format!("Movie ID: {movie_id}")));
    }

    let Some(user) = store.add_favorite_movie(&target.username, movie_id).await? else {
        return Err(user_not_found(&username));
    };

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        movie_id = %movie_id,
        favorites = user.favorite_count(),
        "favorite movie added"
    );

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Removes a movie from a user's favorites.
///
/// Removing a movie that is not favorited is a no-op success.
#[tracing::instrument(skip_all)]
async fn remove_favorite_movie(
    State(store): State<StoreClient>,
    auth_state: AuthState,
    Path((username, movie_id)): Path<(String, Uuid)>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %username,
        movie_id = %movie_id,
        "removing favorite movie"
    );

    let Some(target) = store.find_user_by_username(&username).await? else {
        return Err(user_not_found(&username));
    };
    auth_state.authorize_owner(&target)?;

    let Some(user) = store
        .remove_favorite_movie(&target.username, movie_id)
        .await?
    else {
        return Err(user_not_found(&username));
    };

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        movie_id = %movie_id,
        favorites = user.favorite_count(),
        "favorite movie removed"
    );

    Ok((StatusCode::OK, Json(User::from_model(user))))
}

/// Returns a [`Router`] with the routes reachable without a token.
///
/// [`Router`]: axum::routing::Router
pub fn public_routes() -> Router<ServiceState> {
    Router::new().route("/users", post(register_user))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{username}",
            get(find_user).put(update_user).delete(delete_user),
        )
        .route(
            "/users/{username}/favorites/{movie_id}",
            post(add_favorite_movie).delete(remove_favorite_movie),
        )
}

//! Movie catalog handlers.
//!
//! The catalog is read-mostly: titles, genre listings, and director details
//! are lookups over the document store, while creation is a validated write
//! that enforces title uniqueness. All routes require an access token.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use flix_store::StoreClient;
use flix_store::query::MovieRepository;

use super::request::CreateMovie;
use super::response::{Director, Movie};
use crate::extract::{Json, Path, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for movie operations.
const TRACING_TARGET: &str = "flix_server::handler::movies";

/// Adds a new movie to the catalog.
#[tracing::instrument(skip_all)]
async fn create_movie(
    State(store): State<StoreClient>,
    ValidateJson(request): ValidateJson<CreateMovie>,
) -> Result<(StatusCode, Json<Movie>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        title = %request.title,
        "creating movie"
    );

    let movie = store.create_movie(request.into_model()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        movie_id = %movie.id,
        title = %movie.title,
        "movie created"
    );

    Ok((StatusCode::CREATED, Json(Movie::from_model(movie))))
}

/// Lists all movies in the catalog.
#[tracing::instrument(skip_all)]
async fn list_movies(State(store): State<StoreClient>) -> Result<(StatusCode, Json<Vec<Movie>>)> {
    let movies = store.list_movies().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = movies.len(),
        "movies listed"
    );

    let movies = movies.into_iter().map(Movie::from_model).collect();
    Ok((StatusCode::OK, Json(movies)))
}

/// Retrieves a movie by title.
#[tracing::instrument(skip_all)]
async fn find_movie(
    State(store): State<StoreClient>,
    Path(title): Path<String>,
) -> Result<(StatusCode, Json<Movie>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        title = %title,
        "retrieving movie"
    );

    let Some(movie) = store.find_movie_by_title(&title).await? else {
        return Err(ErrorKind::NotFound
            .with_resource("movies")
            .with_message("Movie not found")
            .with_context(format!("Title: {title}")));
    };

    Ok((StatusCode::OK, Json(Movie::from_model(movie))))
}

/// Lists all movies carrying the given genre.
///
/// Genre matching ignores case; an unknown genre yields an empty list rather
/// than an error.
#[tracing::instrument(skip_all)]
async fn list_movies_by_genre(
    State(store): State<StoreClient>,
    Path(genre): Path<String>,
) -> Result<(StatusCode, Json<Vec<Movie>>)> {
    let movies = store.find_movies_by_genre(&genre).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        genre = %genre,
        count = movies.len(),
        "movies listed by genre"
    );

    let movies = movies.into_iter().map(Movie::from_model).collect();
    Ok((StatusCode::OK, Json(movies)))
}

/// Retrieves director details by name.
#[tracing::instrument(skip_all)]
async fn find_director(
    State(store): State<StoreClient>,
    Path(director): Path<String>,
) -> Result<(StatusCode, Json<Director>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        director = %director,
        "retrieving director"
    );

    let Some(movie) = store.find_movie_by_director(&director).await? else {
        return Err(ErrorKind::NotFound
            .with_resource("movies")
            .with_message("Director not found")
            .with_context(format!("Director: {director}")));
    };

    Ok((StatusCode::OK, Json(Director::from_model(movie.director))))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/genre/{genre}", get(list_movies_by_genre))
        .route("/movies/director/{director}", get(find_director))
        .route("/movies/{title}", get(find_movie))
}

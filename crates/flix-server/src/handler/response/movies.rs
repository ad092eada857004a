//! Movie response types.

use flix_store::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a catalog movie.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Unique identifier of the movie.
    pub movie_id: Uuid,
    /// Title of the movie.
    pub title: String,
    /// Release year.
    pub year: i16,
    /// Synopsis shown in catalog listings.
    pub description: String,
    /// Genre names this movie is listed under.
    pub genres: Vec<String>,
    /// Director details.
    pub director: Director,
    /// Names of credited actors.
    pub actors: Vec<String>,
    /// URL to cover art (optional).
    pub image_url: Option<String>,
    /// Whether the movie is featured on the landing page.
    pub featured: bool,

    /// Timestamp when the movie was created.
    pub created_at: Timestamp,
}

/// Director details embedded in a movie response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    /// Director's full name.
    pub name: String,
    /// Short biography.
    pub bio: String,
    /// Birth year, when known.
    pub birth_year: Option<i16>,
    /// Death year, when applicable.
    pub death_year: Option<i16>,
}

impl Movie {
    pub fn from_model(movie: model::Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title,
            year: movie.year,
            description: movie.description,
            genres: movie.genres,
            director: Director::from_model(movie.director),
            actors: movie.actors,
            image_url: movie.image_url,
            featured: movie.featured,

            created_at: movie.created_at,
        }
    }
}

impl Director {
    pub fn from_model(director: model::Director) -> Self {
        Self {
            name: director.name,
            bio: director.bio,
            birth_year: director.birth_year,
            death_year: director.death_year,
        }
    }
}

//! Movie request types.

use flix_store::model::{Director as DirectorModel, NewMovie};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload to add a movie to the catalog.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    /// Movie title (must be unique across the catalog).
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Release year.
    #[validate(range(min = 1888, max = 2100))]
    pub year: i16,

    /// Synopsis shown in catalog listings.
    #[validate(length(min = 1, max = 2000))]
    pub description: String,

    /// Genre names this movie is listed under.
    #[serde(default)]
    pub genres: Vec<String>,

    /// Director details.
    #[validate(nested)]
    pub director: CreateDirector,

    /// Names of credited actors.
    #[serde(default)]
    pub actors: Vec<String>,

    /// URL to cover art.
    #[validate(url)]
    pub image_url: Option<String>,

    /// Whether the movie is featured on the landing page.
    #[serde(default)]
    pub featured: bool,
}

/// Director details for a new movie.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirector {
    /// Director's full name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Short biography.
    #[validate(length(max = 2000))]
    pub bio: String,

    /// Birth year, when known.
    pub birth_year: Option<i16>,

    /// Death year, when applicable.
    pub death_year: Option<i16>,
}

impl CreateMovie {
    /// Converts this request into a store model.
    pub fn into_model(self) -> NewMovie {
        NewMovie {
            title: self.title,
            year: self.year,
            description: self.description,
            genres: self.genres,
            director: self.director.into_model(),
            actors: self.actors,
            image_url: self.image_url,
            featured: self.featured,
        }
    }
}

impl CreateDirector {
    /// Converts this request into a store model.
    pub fn into_model(self) -> DirectorModel {
        DirectorModel {
            name: self.name,
            bio: self.bio,
            birth_year: self.birth_year,
            death_year: self.death_year,
        }
    }
}

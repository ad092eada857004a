//! Movie document model for store operations.
//!
//! ## Models
//!
//! - [`Movie`] - Persisted movie document with embedded director details
//! - [`NewMovie`] - Data structure for creating new movie documents
//! - [`Director`] - Embedded director sub-document

use jiff::Timestamp;
use uuid::Uuid;

/// Movie document as persisted in the `movies` collection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Unique movie identifier.
    pub id: Uuid,
    /// Unique movie title.
    pub title: String,
    /// Release year.
    pub year: i16,
    /// Synopsis shown in catalog listings.
    pub description: String,
    /// Genre names this movie is listed under.
    pub genres: Vec<String>,
    /// Embedded director details.
    pub director: Director,
    /// Names of credited actors.
    pub actors: Vec<String>,
    /// Optional URL to cover art.
    pub image_url: Option<String>,
    /// Whether the movie is featured on the landing page.
    pub featured: bool,
    /// Timestamp when the movie was created.
    pub created_at: Timestamp,
}

/// Director details embedded in each movie document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
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

/// Data for creating a new movie.
///
/// Also the document shape of seed files, hence the serde derives with
/// lenient defaults for the presentation fields.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use = "models do nothing unless you persist them"]
pub struct NewMovie {
    /// Unique movie title.
    pub title: String,
    /// Release year.
    pub year: i16,
    /// Synopsis shown in catalog listings.
    pub description: String,
    /// Genre names this movie is listed under.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Embedded director details.
    pub director: Director,
    /// Names of credited actors.
    #[serde(default)]
    pub actors: Vec<String>,
    /// Optional URL to cover art.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the movie is featured on the landing page.
    #[serde(default)]
    pub featured: bool,
}

impl Movie {
    /// Returns whether this movie is listed under the given genre.
    ///
    /// Genre comparison ignores ASCII case so `drama` matches `Drama`.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }

    /// Returns whether this movie was directed by the given director.
    pub fn directed_by(&self, director: &str) -> bool {
        self.director.name.eq_ignore_ascii_case(director)
    }
}

impl Director {
    /// Returns whether the director is recorded as deceased.
    pub fn is_deceased(&self) -> bool {
        self.death_year.is_some()
    }
}

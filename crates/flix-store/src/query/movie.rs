//! Movie repository for managing the catalog.

use std::future::Future;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Movie, NewMovie};
use crate::{StoreClient, StoreError, StoreResult, UniqueKey};

/// Repository for movie store operations.
///
/// Handles catalog management: creating entries and the title, genre, and
/// director lookups the browsing endpoints are built on.
pub trait MovieRepository {
    /// Creates a new movie document.
    ///
    /// Normalizes the title before insertion and enforces the unique-title
    /// constraint (titles differing only in ASCII case count as duplicates).
    fn create_movie(&self, new_movie: NewMovie)
    -> impl Future<Output = StoreResult<Movie>> + Send;

    /// Finds a movie by its unique identifier.
    fn find_movie_by_id(
        &self,
        movie_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<Movie>>> + Send;

    /// Finds a movie by title.
    ///
    /// Title comparison ignores ASCII case.
    fn find_movie_by_title(
        &self,
        title: &str,
    ) -> impl Future<Output = StoreResult<Option<Movie>>> + Send;

    /// Finds all movies listed under the given genre, ordered by title.
    fn find_movies_by_genre(
        &self,
        genre: &str,
    ) -> impl Future<Output = StoreResult<Vec<Movie>>> + Send;

    /// Finds a movie directed by the given director.
    ///
    /// When several movies share the director, the earliest-created one is
    /// returned so repeated calls stay stable.
    fn find_movie_by_director(
        &self,
        director: &str,
    ) -> impl Future<Output = StoreResult<Option<Movie>>> + Send;

    /// Lists the whole catalog, ordered by title.
    fn list_movies(&self) -> impl Future<Output = StoreResult<Vec<Movie>>> + Send;

    /// Checks if a movie with the given identifier exists.
    ///
    /// Used before mutating a user's favorites so dangling references are
    /// never stored.
    fn movie_exists(&self, movie_id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Checks if a title is already in the catalog.
    fn title_exists(&self, title: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}

impl MovieRepository for StoreClient {
    async fn create_movie(&self, mut new_movie: NewMovie) -> StoreResult<Movie> {
        new_movie.title = new_movie.title.trim().to_owned();

        let mut movies = self.movies().write().await;
        self.check_capacity(movies.len())?;

        if movies
            .values()
            .any(|m| m.title.eq_ignore_ascii_case(&new_movie.title))
        {
            return Err(StoreError::unique(UniqueKey::MovieTitle));
        }

        let movie = Movie {
            id: Uuid::new_v4(),
            title: new_movie.title,
            year: new_movie.year,
            description: new_movie.description,
            genres: new_movie.genres,
            director: new_movie.director,
            actors: new_movie.actors,
            image_url: new_movie.image_url,
            featured: new_movie.featured,
            created_at: Timestamp::now(),
        };

        movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn find_movie_by_id(&self, movie_id: Uuid) -> StoreResult<Option<Movie>> {
        let movies = self.movies().read().await;
        Ok(movies.get(&movie_id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies().read().await;
        Ok(movies
            .values()
            .find(|m| m.title.eq_ignore_ascii_case(title))
            .cloned())
    }

    async fn find_movies_by_genre(&self, genre: &str) -> StoreResult<Vec<Movie>> {
        let movies = self.movies().read().await;

        let mut matches: Vec<Movie> = movies
            .values()
            .filter(|m| m.has_genre(genre))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(matches)
    }

    async fn find_movie_by_director(&self, director: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies().read().await;
        Ok(movies
            .values()
            .filter(|m| m.directed_by(director))
            .min_by_key(|m| (m.created_at, m.id))
            .cloned())
    }

    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        let movies = self.movies().read().await;

        let mut all: Vec<Movie> = movies.values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn movie_exists(&self, movie_id: Uuid) -> StoreResult<bool> {
        let movies = self.movies().read().await;
        Ok(movies.contains_key(&movie_id))
    }

    async fn title_exists(&self, title: &str) -> StoreResult<bool> {
        let movies = self.movies().read().await;
        Ok(movies.values().any(|m| m.title.eq_ignore_ascii_case(title)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreConfig;
    use crate::model::Director;

    fn test_client() -> StoreClient {
        StoreClient::new(StoreConfig::new()).expect("valid default config")
    }

    fn sample_movie(title: &str, director: &str, genre: &str) -> NewMovie {
        NewMovie {
            title: title.to_owned(),
            year: 2016,
            description: format!("{title} plot summary."),
            genres: vec![genre.to_owned()],
            director: Director {
                name: director.to_owned(),
                bio: "Filmography pending.".to_owned(),
                birth_year: Some(1967),
                death_year: None,
            },
            actors: vec!["Lead Actor".to_owned()],
            image_url: None,
            featured: false,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_title_ignores_case() {
        let client = test_client();
        let created = client
            .create_movie(sample_movie("Arrival", "Denis Villeneuve", "Science Fiction"))
            .await
            .unwrap();

        let found = client.find_movie_by_title("arrival").await.unwrap();
        assert_eq!(found.map(|m| m.id), Some(created.id));

        assert!(client.find_movie_by_title("Sicario").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected() {
        let client = test_client();
        client
            .create_movie(sample_movie("Arrival", "Denis Villeneuve", "Science Fiction"))
            .await
            .unwrap();

        let err = client
            .create_movie(sample_movie("ARRIVAL", "Someone Else", "Drama"))
            .await
            .unwrap_err();
        assert_eq!(err.unique_violation(), Some(UniqueKey::MovieTitle));
    }

    #[tokio::test]
    async fn genre_filter_matches_any_listed_genre() {
        let client = test_client();
        let mut multi_genre = sample_movie("Alien", "Ridley Scott", "Horror");
        multi_genre.genres.push("Science Fiction".to_owned());
        client.create_movie(multi_genre).await.unwrap();
        client
            .create_movie(sample_movie("Arrival", "Denis Villeneuve", "Science Fiction"))
            .await
            .unwrap();
        client
            .create_movie(sample_movie("Heat", "Michael Mann", "Crime"))
            .await
            .unwrap();

        let matches = client.find_movies_by_genre("science fiction").await.unwrap();
        let titles: Vec<&str> = matches.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Arrival"]);
    }

    #[tokio::test]
    async fn director_lookup_is_stable() {
        let client = test_client();
        let first = client
            .create_movie(sample_movie("Arrival", "Denis Villeneuve", "Science Fiction"))
            .await
            .unwrap();
        client
            .create_movie(sample_movie("Sicario", "Denis Villeneuve", "Thriller"))
            .await
            .unwrap();

        for _ in 0..3 {
            let found = client
                .find_movie_by_director("denis villeneuve")
                .await
                .unwrap()
                .expect("director has movies");
            assert_eq!(found.id, first.id);
        }

        assert!(
            client
                .find_movie_by_director("Unknown Name")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_movies_ordered_by_title() {
        let client = test_client();
        client
            .create_movie(sample_movie("Heat", "Michael Mann", "Crime"))
            .await
            .unwrap();
        client
            .create_movie(sample_movie("Alien", "Ridley Scott", "Horror"))
            .await
            .unwrap();

        let all = client.list_movies().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Heat"]);
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let config = StoreConfig::new().with_max_documents(16);
        let client = StoreClient::new(config).expect("valid config");

        for i in 0..16 {
            client
                .create_movie(sample_movie(&format!("Movie {i}"), "Some Director", "Drama"))
                .await
                .unwrap();
        }

        let err = client
            .create_movie(sample_movie("One Too Many", "Some Director", "Drama"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unexpected(_)));
    }

    #[tokio::test]
    async fn movie_exists_by_id() {
        let client = test_client();
        let created = client
            .create_movie(sample_movie("Arrival", "Denis Villeneuve", "Science Fiction"))
            .await
            .unwrap();

        assert!(client.movie_exists(created.id).await.unwrap());
        assert!(!client.movie_exists(Uuid::new_v4()).await.unwrap());
    }
}

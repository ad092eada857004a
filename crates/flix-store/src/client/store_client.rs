use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Movie, NewMovie, User};
use crate::query::MovieRepository;
use crate::{StoreConfig, StoreError, StoreResult, TRACING_TARGET_CLIENT};

/// Document store status information.
#[derive(Debug, Clone)]
pub struct StoreStatus {
    /// Number of documents in the `users` collection
    pub users: usize,
    /// Number of documents in the `movies` collection
    pub movies: usize,
    /// Per-collection document cap
    pub max_documents: usize,
}

impl StoreStatus {
    /// Returns the total number of documents across all collections.
    #[inline]
    pub fn total_documents(&self) -> usize {
        self.users + self.movies
    }

    /// Returns the utilization of the fullest collection (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_documents == 0 {
            0.0
        } else {
            self.users.max(self.movies) as f64 / self.max_documents as f64
        }
    }

    /// Returns whether either collection is close to its document cap.
    #[inline]
    pub fn is_near_capacity(&self) -> bool {
        self.utilization() > 0.8
    }
}

/// High-level document store client over the in-process collections.
///
/// This struct provides the main interface for store operations. Cloning is
/// cheap and every clone shares the same underlying collections, so a single
/// client can be handed to each request handler.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

/// Inner data for StoreClient
struct StoreClientInner {
    users: RwLock<HashMap<Uuid, User>>,
    movies: RwLock<HashMap<Uuid, Movie>>,
    config: StoreConfig,
}

impl StoreClient {
    /// Creates a new store client with the provided configuration.
    ///
    /// Collections start empty; use [`StoreClient::new_with_seed`] to also
    /// load the configured seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CLIENT)]
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        tracing::info!(target: TRACING_TARGET_CLIENT, "Initializing document store");
        config.validate()?;

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                users: RwLock::new(HashMap::new()),
                movies: RwLock::new(HashMap::new()),
                config,
            }),
        })
    }

    /// Creates a new store client and loads seed data when configured.
    ///
    /// Reads the seed file named by [`StoreConfig::store_seed_path`] (a JSON
    /// array of movie documents) and inserts each entry. Seed entries whose
    /// title is already taken are skipped with a warning rather than failing
    /// startup.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the seed file cannot be
    /// read or parsed.
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CLIENT)]
    pub async fn new_with_seed(config: StoreConfig) -> StoreResult<Self> {
        let this = Self::new(config)?;

        let Some(seed_path) = this.inner.config.store_seed_path.clone() else {
            return Ok(this);
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            seed_path = %seed_path.display(),
            "Loading seed data"
        );

        let bytes = tokio::fs::read(&seed_path).await.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                seed_path = %seed_path.display(),
                error = %err,
                "Failed to read seed file"
            );
            StoreError::Unexpected(format!("failed to read seed file: {err}").into())
        })?;

        let seed_movies: Vec<NewMovie> = serde_json::from_slice(&bytes).map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                seed_path = %seed_path.display(),
                error = %err,
                "Failed to parse seed file"
            );
            StoreError::Unexpected(format!("failed to parse seed file: {err}").into())
        })?;

        let mut loaded = 0usize;
        let mut skipped = 0usize;
        for seed_movie in seed_movies {
            match this.create_movie(seed_movie).await {
                Ok(_) => loaded += 1,
                Err(StoreError::UniqueViolation(field)) => {
                    tracing::warn!(
                        target: TRACING_TARGET_CLIENT,
                        field,
                        "Skipping seed movie with duplicate unique key"
                    );
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            loaded,
            skipped,
            "Document store initialized with seed data"
        );

        Ok(this)
    }

    /// Gets the current collection sizes, mainly for the health endpoint.
    pub async fn status(&self) -> StoreStatus {
        let users = self.inner.users.read().await.len();
        let movies = self.inner.movies.read().await.len();

        StoreStatus {
            users,
            movies,
            max_documents: self.inner.config.max_documents(),
        }
    }

    /// Gets the store configuration used by this client.
    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// The `users` collection lock, for repository implementations.
    #[inline]
    pub(crate) fn users(&self) -> &RwLock<HashMap<Uuid, User>> {
        &self.inner.users
    }

    /// The `movies` collection lock, for repository implementations.
    #[inline]
    pub(crate) fn movies(&self) -> &RwLock<HashMap<Uuid, Movie>> {
        &self.inner.movies
    }

    /// Returns an error when a collection of `len` documents cannot take one more.
    pub(crate) fn check_capacity(&self, len: usize) -> StoreResult<()> {
        if len >= self.inner.config.max_documents() {
            return Err(StoreError::Unexpected(
                format!(
                    "collection at capacity ({} documents)",
                    self.inner.config.max_documents()
                )
                .into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("max_documents", &self.inner.config.store_max_documents)
            .field("seed_path", &self.inner.config.store_seed_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_store_starts_empty() {
        let client = StoreClient::new(StoreConfig::new()).expect("valid config");
        let status = client.status().await;

        assert_eq!(status.users, 0);
        assert_eq!(status.movies, 0);
        assert_eq!(status.total_documents(), 0);
        assert!(!status.is_near_capacity());
    }

    #[tokio::test]
    async fn new_with_seed_without_path_starts_empty() {
        let client = StoreClient::new_with_seed(StoreConfig::new())
            .await
            .expect("valid config without seed");

        assert_eq!(client.status().await.movies, 0);
    }

    #[tokio::test]
    async fn clones_share_collections() {
        let client = StoreClient::new(StoreConfig::new()).expect("valid config");
        let clone = client.clone();

        client.movies().write().await.insert(
            Uuid::new_v4(),
            Movie {
                id: Uuid::new_v4(),
                title: "Arrival".to_owned(),
                year: 2016,
                description: "A linguist decodes an alien language.".to_owned(),
                genres: vec!["Science Fiction".to_owned()],
                director: crate::model::Director {
                    name: "Denis Villeneuve".to_owned(),
                    bio: "Canadian filmmaker.".to_owned(),
                    birth_year: Some(1967),
                    death_year: None,
                },
                actors: vec!["Amy Adams".to_owned()],
                image_url: None,
                featured: true,
                created_at: jiff::Timestamp::now(),
            },
        );

        assert_eq!(clone.status().await.movies, 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let result = StoreClient::new(StoreConfig::new().with_max_documents(0));
        assert!(result.is_err());
    }
}

//! User repository for managing user documents.

use std::future::Future;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{NewUser, UpdateUser, User};
use crate::{StoreClient, StoreError, StoreResult, UniqueKey};

/// Repository for user store operations.
///
/// Handles user lifecycle management including registration, profile
/// management, and the favorites list.
pub trait UserRepository {
    /// Creates a new user document.
    ///
    /// Normalizes the username and email before insertion and enforces the
    /// unique-username and unique-email constraints.
    fn create_user(&self, new_user: NewUser) -> impl Future<Output = StoreResult<User>> + Send;

    /// Finds a user by their unique identifier.
    fn find_user_by_id(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Finds a user by their login handle.
    ///
    /// Username comparison is exact; handles are stored as registered.
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Lists all users, most recently created first.
    fn list_users(&self) -> impl Future<Output = StoreResult<Vec<User>>> + Send;

    /// Updates a user with new information.
    ///
    /// Applies partial updates to the document addressed by `username`. Only
    /// fields set to `Some(value)` are modified. Returns `None` when no user
    /// matches; renaming onto a taken username or email fails with a
    /// unique-violation error and leaves the document untouched.
    fn update_user(
        &self,
        username: &str,
        updates: UpdateUser,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Deletes a user document.
    ///
    /// Returns the removed document, or `None` when no user matches.
    fn delete_user(
        &self,
        username: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Adds a movie to a user's favorites.
    ///
    /// The favorites list never holds duplicates; adding an id that is
    /// already present leaves the document unchanged. Returns the updated
    /// document, or `None` when no user matches.
    fn add_favorite_movie(
        &self,
        username: &str,
        movie_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Removes a movie from a user's favorites.
    ///
    /// Removing an id that is not present leaves the document unchanged.
    /// Returns the updated document, or `None` when no user matches.
    fn remove_favorite_movie(
        &self,
        username: &str,
        movie_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Checks if a username is already registered.
    ///
    /// Used during registration to prevent duplicate handles.
    fn username_exists(&self, username: &str) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Checks if an email address is already registered.
    ///
    /// Email comparison is case-insensitive; addresses are stored lowercase.
    fn email_exists(&self, email: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}

impl UserRepository for StoreClient {
    async fn create_user(&self, mut new_user: NewUser) -> StoreResult<User> {
        // Normalize fields: trim whitespace, lowercase the email
        new_user.username = new_user.username.trim().to_owned();
        new_user.email = new_user.email.trim().to_lowercase();

        let mut users = self.users().write().await;
        self.check_capacity(users.len())?;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::unique(UniqueKey::Username));
        }
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::unique(UniqueKey::Email));
        }

        let now = Timestamp::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            birthday: new_user.birthday,
            favorite_movies: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users().read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users().read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users().read().await;

        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(all)
    }

    async fn update_user(&self, username: &str, updates: UpdateUser) -> StoreResult<Option<User>> {
        let mut users = self.users().write().await;

        let Some(user_id) = users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
        else {
            return Ok(None);
        };

        // Enforce uniqueness against every other document before mutating
        if let Some(new_username) = updates.username.as_deref().map(str::trim)
            && users
                .values()
                .any(|u| u.id != user_id && u.username == new_username)
        {
            return Err(StoreError::unique(UniqueKey::Username));
        }
        if let Some(new_email) = updates.email.as_deref().map(|e| e.trim().to_lowercase())
            && users
                .values()
                .any(|u| u.id != user_id && u.email == new_email)
        {
            return Err(StoreError::unique(UniqueKey::Email));
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::Unexpected("user vanished during update".into()))?;

        if let Some(new_username) = updates.username {
            user.username = new_username.trim().to_owned();
        }
        if let Some(new_email) = updates.email {
            user.email = new_email.trim().to_lowercase();
        }
        if let Some(new_password_hash) = updates.password_hash {
            user.password_hash = new_password_hash;
        }
        if let Some(new_birthday) = updates.birthday {
            user.birthday = Some(new_birthday);
        }
        user.updated_at = Timestamp::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, username: &str) -> StoreResult<Option<User>> {
        let mut users = self.users().write().await;

        let Some(user_id) = users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
        else {
            return Ok(None);
        };

        Ok(users.remove(&user_id))
    }

    async fn add_favorite_movie(
        &self,
        username: &str,
        movie_id: Uuid,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users().write().await;

        let Some(user) = users.values_mut().find(|u| u.username == username) else {
            return Ok(None);
        };

        if !user.favorite_movies.contains(&movie_id) {
            user.favorite_movies.push(movie_id);
            user.updated_at = Timestamp::now();
        }

        Ok(Some(user.clone()))
    }

    async fn remove_favorite_movie(
        &self,
        username: &str,
        movie_id: Uuid,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users().write().await;

        let Some(user) = users.values_mut().find(|u| u.username == username) else {
            return Ok(None);
        };

        if user.favorite_movies.contains(&movie_id) {
            user.favorite_movies.retain(|id| *id != movie_id);
            user.updated_at = Timestamp::now();
        }

        Ok(Some(user.clone()))
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let users = self.users().read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let email = email.trim().to_lowercase();
        let users = self.users().read().await;
        Ok(users.values().any(|u| u.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreConfig;

    fn test_client() -> StoreClient {
        StoreClient::new(StoreConfig::new()).expect("valid default config")
    }

    fn sample_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            birthday: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let client = test_client();

        let created = client.create_user(sample_user("alice")).await.unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.email, "alice@example.com");
        assert!(created.favorite_movies.is_empty());

        let by_name = client.find_user_by_username("alice").await.unwrap();
        assert_eq!(by_name.as_ref().map(|u| u.id), Some(created.id));

        let by_id = client.find_user_by_id(created.id).await.unwrap();
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn create_normalizes_username_and_email() {
        let client = test_client();

        let mut new_user = sample_user("carol");
        new_user.username = "  carol  ".to_owned();
        new_user.email = " Carol@Example.COM ".to_owned();

        let created = client.create_user(new_user).await.unwrap();
        assert_eq!(created.username, "carol");
        assert_eq!(created.email, "carol@example.com");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();

        let mut duplicate = sample_user("alice");
        duplicate.email = "other@example.com".to_owned();

        let err = client.create_user(duplicate).await.unwrap_err();
        assert_eq!(err.unique_violation(), Some(UniqueKey::Username));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();

        let mut duplicate = sample_user("bob");
        duplicate.email = "ALICE@example.com".to_owned();

        let err = client.create_user(duplicate).await.unwrap_err();
        assert_eq!(err.unique_violation(), Some(UniqueKey::Email));
    }

    #[tokio::test]
    async fn update_applies_only_set_fields() {
        let client = test_client();
        let created = client.create_user(sample_user("alice")).await.unwrap();

        let updated = client
            .update_user(
                "alice",
                UpdateUser {
                    email: Some("new@example.com".to_owned()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap()
            .expect("user exists");

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.password_hash, created.password_hash);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_user_returns_none() {
        let client = test_client();
        let result = client
            .update_user("ghost", UpdateUser::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_rejects_taken_username() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();
        client.create_user(sample_user("bob")).await.unwrap();

        let err = client
            .update_user(
                "bob",
                UpdateUser {
                    username: Some("alice".to_owned()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.unique_violation(), Some(UniqueKey::Username));

        // The rejected rename must leave the document untouched
        let bob = client.find_user_by_username("bob").await.unwrap();
        assert!(bob.is_some());
    }

    #[tokio::test]
    async fn rename_to_own_username_is_allowed() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();

        let updated = client
            .update_user(
                "alice",
                UpdateUser {
                    username: Some("alice".to_owned()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_some());
    }

    #[tokio::test]
    async fn delete_returns_document_then_none() {
        let client = test_client();
        let created = client.create_user(sample_user("alice")).await.unwrap();

        let deleted = client.delete_user("alice").await.unwrap();
        assert_eq!(deleted.map(|u| u.id), Some(created.id));

        assert!(client.find_user_by_username("alice").await.unwrap().is_none());
        assert!(client.delete_user("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn favorites_add_is_idempotent() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();
        let movie_id = Uuid::new_v4();

        let first = client
            .add_favorite_movie("alice", movie_id)
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(first.favorite_movies, vec![movie_id]);

        let second = client
            .add_favorite_movie("alice", movie_id)
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(second.favorite_movies, vec![movie_id]);
    }

    #[tokio::test]
    async fn favorites_remove_absent_id_is_noop() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();
        let kept = Uuid::new_v4();
        client.add_favorite_movie("alice", kept).await.unwrap();

        let after = client
            .remove_favorite_movie("alice", Uuid::new_v4())
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(after.favorite_movies, vec![kept]);
    }

    #[tokio::test]
    async fn list_users_most_recent_first() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();
        client.create_user(sample_user("bob")).await.unwrap();

        let all = client.list_users().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);
    }

    #[tokio::test]
    async fn existence_checks() {
        let client = test_client();
        client.create_user(sample_user("alice")).await.unwrap();

        assert!(client.username_exists("alice").await.unwrap());
        assert!(!client.username_exists("bob").await.unwrap());
        assert!(client.email_exists("ALICE@example.com").await.unwrap());
        assert!(!client.email_exists("bob@example.com").await.unwrap());
    }
}

//! User document model for store operations.
//!
//! This module provides the core user model for authentication and profile
//! management.
//!
//! ## Models
//!
//! - [`User`] - Persisted user document with credentials and favorites
//! - [`NewUser`] - Data structure for creating new user documents
//! - [`UpdateUser`] - Data structure for partial user updates

use jiff::Timestamp;
use jiff::civil::Date;
use uuid::Uuid;

/// User document as persisted in the `users` collection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login handle (5+ alphanumeric characters).
    pub username: String,
    /// Unique email address (validated format, stored lowercase).
    pub email: String,
    /// Password hash in PHC string format. Never the plaintext.
    pub password_hash: String,
    /// Optional date of birth.
    pub birthday: Option<Date>,
    /// Identifiers of favorited movies, insertion-ordered, no duplicates.
    pub favorite_movies: Vec<Uuid>,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
#[must_use = "models do nothing unless you persist them"]
pub struct NewUser {
    /// Unique login handle.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Password hash in PHC string format.
    pub password_hash: String,
    /// Optional date of birth.
    pub birthday: Option<Date>,
}

/// Data for updating a user.
///
/// Only fields set to `Some(value)` are applied; the rest of the document
/// is left untouched.
#[derive(Debug, Clone, Default)]
#[must_use = "models do nothing unless you persist them"]
pub struct UpdateUser {
    /// New login handle.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New password hash. Callers hash before building the update.
    pub password_hash: Option<String>,
    /// New date of birth.
    pub birthday: Option<Date>,
}

impl User {
    /// Returns whether the given movie is in this user's favorites.
    pub fn has_favorite(&self, movie_id: Uuid) -> bool {
        self.favorite_movies.contains(&movie_id)
    }

    /// Returns the number of favorited movies.
    pub fn favorite_count(&self) -> usize {
        self.favorite_movies.len()
    }

    /// Returns whether this user owns the resource addressed by `username`.
    ///
    /// Ownership is decided by the login handle since self-service routes
    /// are parameterized by username rather than id.
    pub fn owns(&self, username: &str) -> bool {
        self.username == username
    }
}

impl UpdateUser {
    /// Returns whether the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.birthday.is_none()
    }
}

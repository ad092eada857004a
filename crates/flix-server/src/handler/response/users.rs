//! User response types.

use flix_store::model;
use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a registered user.
///
/// The password hash stays in the store layer; this view carries only the
/// fields safe for client display.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier of the user.
    pub user_id: Uuid,
    /// Login handle of the user.
    pub username: String,
    /// Email address associated with the user.
    pub email: String,
    /// Date of birth (optional).
    pub birthday: Option<Date>,
    /// Identifiers of the user's favorited movies.
    pub favorite_movies: Vec<Uuid>,

    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

impl User {
    pub fn from_model(user: model::User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            birthday: user.birthday,
            favorite_movies: user.favorite_movies,

            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_never_exposes_password_hash() {
        let user = User::from_model(model::User {
            id: Uuid::new_v4(),
            username: "moviefan".to_owned(),
            email: "fan@example.com".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            birthday: None,
            favorite_movies: Vec::new(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        });

        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("moviefan"));
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("argon2id"));
    }
}

//! User request types.

use flix_store::model::{NewUser, UpdateUser as UpdateUserModel};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request payload to register a new user.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Login handle (5-32 alphanumeric characters).
    #[validate(length(min = 5, max = 32))]
    #[validate(custom(function = "validate_username_format"))]
    pub username: String,

    /// Email address.
    #[validate(email)]
    pub email: String,

    /// Plaintext password; never stored as-is.
    #[validate(length(min = 1, max = 256))]
    pub password: String,

    /// Date of birth.
    pub birthday: Option<Date>,
}

impl CreateUser {
    /// Converts this request into a store model.
    ///
    /// The caller hashes the password first; only the hash goes in.
    pub fn into_model(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            password_hash,
            birthday: self.birthday,
        }
    }
}

/// Request payload to update a user profile.
///
/// Only the provided fields are applied; the rest of the profile is left
/// untouched.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New login handle (5-32 alphanumeric characters).
    #[validate(length(min = 5, max = 32))]
    #[validate(custom(function = "validate_username_format"))]
    pub username: Option<String>,

    /// New email address.
    #[validate(email)]
    pub email: Option<String>,

    /// New plaintext password; never stored as-is.
    #[validate(length(min = 1, max = 256))]
    pub password: Option<String>,

    /// New date of birth.
    pub birthday: Option<Date>,
}

impl UpdateUser {
    /// Converts this request into a store model.
    ///
    /// The caller hashes the replacement password first, if one was sent.
    pub fn into_model(self, password_hash: Option<String>) -> UpdateUserModel {
        UpdateUserModel {
            username: self.username,
            email: self.email,
            password_hash,
            birthday: self.birthday,
        }
    }
}

fn validate_username_format(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("username_format");
        error.message = Some("must contain only letters and digits".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_format_accepts_alphanumeric() {
        assert!(validate_username_format("moviefan42").is_ok());
        assert!(validate_username_format("under_score").is_err());
        assert!(validate_username_format("with space").is_err());
    }
}

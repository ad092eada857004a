//! JSON body extractor that validates after deserializing.
//!
//! [`ValidateJson`] chains [`Json`] extraction with `validator::Validate`,
//! so handlers receive payloads that already satisfy their declared rules.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON body extractor with post-deserialization validation.
///
/// Deserialization failures reject exactly like [`Json`]; rule violations
/// reject with a 422 whose message lists every failing field, one clause
/// per violation.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Wraps an already-validated value.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        payload.validate()?;
        Ok(Self(payload))
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let clauses: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, violations)| {
                violations
                    .iter()
                    .map(move |violation| describe_violation(field, violation))
            })
            .collect();

        let message = if clauses.is_empty() {
            "Validation failed".to_owned()
        } else {
            clauses.join(". ")
        };

        tracing::warn!(
            errors = ?errors.field_errors(),
            "rejected request payload"
        );

        ErrorKind::InvalidInput
            .with_message(message)
            .with_resource("request")
    }
}

/// Renders one rule violation as a client-facing clause.
///
/// A message attached to the rule wins outright; otherwise the rule code
/// and its parameters are phrased generically.
fn describe_violation(field: &str, violation: &ValidationError) -> String {
    if let Some(message) = &violation.message {
        return format!("Field '{field}': {message}");
    }

    match violation.code.as_ref() {
        "length" => match bounds(&violation.params) {
            (Some(min), Some(max)) => {
                format!("Field '{field}' must be {min} to {max} characters")
            }
            (Some(min), None) => format!("Field '{field}' needs at least {min} characters"),
            (None, Some(max)) => format!("Field '{field}' allows at most {max} characters"),
            (None, None) => format!("Field '{field}' has an invalid length"),
        },
        "range" => match bounds(&violation.params) {
            (Some(min), Some(max)) => format!("Field '{field}' must lie between {min} and {max}"),
            (Some(min), None) => format!("Field '{field}' must be {min} or more"),
            (None, Some(max)) => format!("Field '{field}' must be {max} or less"),
            (None, None) => format!("Field '{field}' is out of range"),
        },
        "email" => format!("Field '{field}' must be a valid email address"),
        "url" => format!("Field '{field}' must be a valid URL"),
        "required" => format!("Field '{field}' is required"),
        code => format!("Field '{field}' failed the '{code}' rule"),
    }
}

/// Pulls the `min`/`max` rule parameters out as displayable numbers.
fn bounds<'a>(
    params: &'a HashMap<Cow<'static, str>, serde_json::Value>,
) -> (Option<&'a serde_json::Value>, Option<&'a serde_json::Value>) {
    let numeric = |key: &str| params.get(key).filter(|value| value.is_number());
    (numeric("min"), numeric("max"))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct SignupProbe {
        #[validate(length(min = 5))]
        username: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn validation_errors_become_invalid_input() {
        let probe = SignupProbe {
            username: "ab".to_owned(),
            email: "not-an-email".to_owned(),
        };

        let errors = probe.validate().expect_err("probe must fail validation");
        let error = Error::from(errors);

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.resource(), Some("request"));

        let message = error.message().unwrap_or_default().to_owned();
        assert!(message.contains("username"));
        assert!(message.contains("email"));
    }

    #[test]
    fn valid_payload_produces_no_errors() {
        let probe = SignupProbe {
            username: "moviegoer".to_owned(),
            email: "moviegoer@example.com".to_owned(),
        };

        assert!(probe.validate().is_ok());
    }

    #[test]
    fn length_bounds_are_spelled_out() {
        #[derive(Debug, Deserialize, Validate)]
        struct TitleProbe {
            #[validate(length(min = 1, max = 255))]
            title: String,
        }

        let errors = TitleProbe {
            title: String::new(),
        }
        .validate()
        .expect_err("empty title must fail");

        let error = Error::from(errors);
        let message = error.message().unwrap_or_default();
        assert!(message.contains('1'));
        assert!(message.contains("255"));
    }
}

//! Signing key management for JWT access tokens.
//!
//! This module derives the HMAC-SHA256 signing and verification keys used
//! for access tokens from a single shared secret, and carries the validation
//! rules applied to every presented token.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::Span;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Target identifier for access key management logging and error reporting.
const TRACING_TARGET: &str = "flix_server::access_keys";

// Secret and token lifetime bounds.
const MIN_SECRET_BYTES: usize = 32;

const MIN_TOKEN_TTL_SECS: u64 = 60;
const MAX_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

/// Access token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct AccessKeysConfig {
    /// Shared secret used to sign and verify access tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_SECRET", hide_env_values = true)
    )]
    pub auth_secret: String,

    /// Lifetime of newly issued access tokens, in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ACCESS_TOKEN_TTL_SECS", default_value = "3600")
    )]
    #[serde(default = "default_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
}

impl AccessKeysConfig {
    /// Creates a new configuration with the given signing secret and the
    /// default token lifetime.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            access_token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Sets the lifetime of newly issued access tokens.
    pub fn with_token_ttl_secs(mut self, access_token_ttl_secs: u64) -> Self {
        self.access_token_ttl_secs = access_token_ttl_secs;
        self
    }

    /// Validates the signing secret and token lifetime.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is shorter than the
    /// minimum byte length or the token lifetime is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.auth_secret.len() < MIN_SECRET_BYTES {
            return Err(Error::config(format!(
                "auth_secret must be at least {} bytes long",
                MIN_SECRET_BYTES
            )));
        }

        if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&self.access_token_ttl_secs) {
            return Err(Error::config(format!(
                "access_token_ttl_secs must be between {} and {}",
                MIN_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for AccessKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeysConfig")
            .field("auth_secret", &"[redacted]")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .finish()
    }
}

/// The HS256 key pair plus the validation rules for presented tokens.
///
/// Cheaply cloneable; every clone shares the keys derived once from the
/// configured secret.
#[derive(Clone)]
pub struct AccessKeys {
    inner: Arc<AccessKeysInner>,
}

struct AccessKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: AccessKeysConfig,
}

impl AccessKeys {
    /// Derives the signing and verification keys from the configured secret.
    ///
    /// Both directions use the same HMAC secret, so nothing is read from
    /// disk and the keys are ready as soon as the config validates.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn from_config(config: &AccessKeysConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            token_ttl_secs = config.access_token_ttl_secs,
            "deriving access token keys",
        );

        let secret = config.auth_secret.as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        // sub/iat/exp are the only claims issued, and all three are required
        // on the way back in. nbf and aud are never set.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        tracing::info!(
            target: TRACING_TARGET,
            "access token keys ready",
        );

        let inner = Arc::new(AccessKeysInner {
            encoding_key,
            decoding_key,
            validation,
            config: config.clone(),
        });

        Ok(Self { inner })
    }

    /// Derives keys from a bare secret with the default token lifetime.
    pub fn new(auth_secret: impl Into<String>) -> Result<Self> {
        let config = AccessKeysConfig::new(auth_secret);
        Self::from_config(&config)
    }

    /// Key that signs newly issued tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Key that verifies presented tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the validation rules applied to presented tokens.
    #[inline]
    pub fn validation(&self) -> &Validation {
        &self.inner.validation
    }

    /// Returns the configured lifetime of newly issued tokens.
    #[inline]
    pub fn token_ttl(&self) -> Span {
        Span::new().seconds(self.inner.config.access_token_ttl_secs as i64)
    }

    /// The configuration these keys were derived from.
    #[inline]
    pub fn config(&self) -> &AccessKeysConfig {
        &self.inner.config
    }

    /// Proves the key pair works by round-tripping a short-lived token.
    ///
    /// Run once at startup so a bad secret fails the boot instead of the
    /// first login.
    ///
    /// # Errors
    ///
    /// Fails when signing or verifying the probe token fails.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Header, decode, encode};

        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            iat: i64,
            exp: i64,
        }

        let now = jiff::Timestamp::now().as_second();
        let claims = ProbeClaims {
            sub: "probe".to_string(),
            iat: now,
            exp: now + 300,
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, self.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "probe token could not be signed",
            );

            Error::auth("signing probe failed").with_source(e)
        })?;

        decode::<ProbeClaims>(&token, self.decoding_key(), self.validation()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "probe token could not be verified",
            );
            Error::auth("verification probe failed").with_source(e)
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            "probe token round-tripped",
        );

        Ok(())
    }
}

impl fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeys")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn derive_valid_keys() {
        let keys = AccessKeys::new(TEST_SECRET).unwrap();
        let result = keys.validate_keys();
        assert!(result.is_ok(), "validate_keys failed: {:?}", result.err());
    }

    #[test]
    fn reject_short_secret() {
        assert!(AccessKeys::new("too-short").is_err());
    }

    #[test]
    fn reject_out_of_range_token_ttl() {
        let too_short = AccessKeysConfig::new(TEST_SECRET).with_token_ttl_secs(1);
        assert!(too_short.validate().is_err());

        let too_long = AccessKeysConfig::new(TEST_SECRET).with_token_ttl_secs(30 * 24 * 60 * 60);
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn token_ttl_matches_config() {
        let config = AccessKeysConfig::new(TEST_SECRET).with_token_ttl_secs(7200);
        let keys = AccessKeys::from_config(&config).unwrap();
        assert_eq!(keys.token_ttl().get_seconds(), 7200);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AccessKeysConfig::new(TEST_SECRET);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(TEST_SECRET));
        assert!(rendered.contains("[redacted]"));
    }
}

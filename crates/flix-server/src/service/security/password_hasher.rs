//! Password hashing and verification using Argon2id.
//!
//! This module provides the one-way password hashing used by account
//! registration and login. Hashes are emitted in PHC string format with a
//! per-password random salt, so the stored value embeds the algorithm,
//! cost parameters, and salt needed for later verification.

use argon2::password_hash::{Error as ArgonError, try_generate_salt};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::handler::{ErrorKind, Result};

/// Tracing target for hashing and verification events.
const TRACING_TARGET: &str = "flix_server::password_hasher";

// Argon2id cost bounds.
const MIN_MEMORY_KIB: u32 = 8 * 1024;
const MAX_MEMORY_KIB: u32 = 256 * 1024;
const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

const MIN_ITERATIONS: u32 = 1;
const MAX_ITERATIONS: u32 = 16;
const DEFAULT_ITERATIONS: u32 = 2;

fn default_memory_kib() -> u32 {
    DEFAULT_MEMORY_KIB
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

/// Argon2id cost parameter configuration.
///
/// Defaults follow the OWASP recommendation for Argon2id (19 MiB memory,
/// 2 iterations). Raising either value makes each login and registration
/// proportionally more expensive for both the server and an attacker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct PasswordHasherConfig {
    /// Memory cost of a single hashing operation, in KiB.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "HASH_MEMORY_KIB", default_value = "19456")
    )]
    #[serde(default = "default_memory_kib")]
    pub hash_memory_kib: u32,

    /// Number of passes over the memory block per hashing operation.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "HASH_ITERATIONS", default_value = "2")
    )]
    #[serde(default = "default_iterations")]
    pub hash_iterations: u32,
}

impl PasswordHasherConfig {
    /// Validates that all cost parameters fall within supported bounds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the memory cost or iteration count
    /// is outside its allowed range.
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.hash_memory_kib) {
            return Err(crate::Error::config(format!(
                "hash_memory_kib must be between {} and {}",
                MIN_MEMORY_KIB, MAX_MEMORY_KIB
            )));
        }

        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.hash_iterations) {
            return Err(crate::Error::config(format!(
                "hash_iterations must be between {} and {}",
                MIN_ITERATIONS, MAX_ITERATIONS
            )));
        }

        Ok(())
    }
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            hash_memory_kib: DEFAULT_MEMORY_KIB,
            hash_iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Argon2id hashing and verification for account passwords.
///
/// The hashing and verification methods are designed for use in HTTP
/// handlers and return responses suitable for client consumption. A fixed
/// dummy hash is minted once at construction so login can burn an
/// indistinguishable verification when no account matches.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service with the cost
    /// parameters from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are out of range or
    /// rejected by the Argon2 implementation, and an authentication error if
    /// the dummy hash cannot be generated.
    pub fn from_config(config: &PasswordHasherConfig) -> crate::Result<Self> {
        config.validate()?;

        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| crate::Error::config(format!("unsupported Argon2 parameters: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = Self::generate_dummy_hash(&argon2)?;

        tracing::debug!(
            target: TRACING_TARGET,
            memory_kib = config.hash_memory_kib,
            iterations = config.hash_iterations,
            "Configured Argon2id password hasher"
        );

        Ok(Self { argon2, dummy_hash })
    }

    /// Mints the hash that [`verify_dummy_password`] checks against.
    ///
    /// The hashed password is random and immediately discarded, so the
    /// resulting hash can never correspond to a credential a client submits.
    ///
    /// [`verify_dummy_password`]: Self::verify_dummy_password
    fn generate_dummy_hash(argon2: &Argon2<'static>) -> crate::Result<String> {
        use rand::RngExt;

        let dummy_password: String = (0..32)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        let salt = try_generate_salt()
            .map_err(|e| crate::Error::auth("failed to generate dummy hash salt").with_source(e))?;
        let dummy_hash = argon2
            .hash_password_with_salt(dummy_password.as_bytes(), &salt)
            .map_err(|e| crate::Error::auth("failed to generate dummy hash").with_source(e))?;

        Ok(dummy_hash.to_string())
    }

    /// Hashes a password for storage, salting it with fresh OS randomness.
    ///
    /// The result is a PHC string embedding the algorithm, cost parameters,
    /// salt, and digest, so [`verify_password`] needs nothing else to check
    /// it later. The plaintext is never logged.
    ///
    /// # Errors
    ///
    /// Salt generation and hashing failures both surface as internal server
    /// errors; neither reveals anything about the submitted password.
    ///
    /// [`verify_password`]: Self::verify_password
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = try_generate_salt().map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "salt generation failed"
            );

            ErrorKind::InternalServerError
                .with_message("Could not process the password")
                .with_context("salt generation failed")
                .with_resource("authentication")
        })?;

        let password_hash = self
            .argon2
            .hash_password_with_salt(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Could not process the password")
                    .with_context("hashing failed")
                    .with_resource("authentication")
            })?;

        Ok(password_hash.to_string())
    }

    /// Checks a password against the PHC string stored for an account.
    ///
    /// # Errors
    ///
    /// A mismatched password comes back as [`InvalidCredentials`]; an
    /// unparsable stored hash or an Argon2 failure comes back as an internal
    /// server error. The 400-level error never says which check failed.
    ///
    /// [`InvalidCredentials`]: ErrorKind::InvalidCredentials
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "stored password hash is unparsable"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication is temporarily unavailable")
                .with_context("stored hash is unreadable")
                .with_resource("authentication")
        })?;

        let verification = self.argon2.verify_password(password.as_bytes(), &parsed_hash);

        match verification {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password verified"
                );

                Ok(())
            }
            Err(ArgonError::PasswordInvalid) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password rejected"
                );

                Err(ErrorKind::InvalidCredentials
                    .with_message("Authentication failed")
                    .with_context("credentials rejected")
                    .with_resource("authentication"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification errored"
                );

                Err(ErrorKind::InternalServerError
                    .with_message("Authentication is temporarily unavailable")
                    .with_context("verification failed")
                    .with_resource("authentication"))
            }
        }
    }

    /// Burns one verification against the fixed dummy hash and returns false.
    ///
    /// Login calls this when no account matches the submitted username.
    /// Because it performs exactly one Argon2id verification against the
    /// hash minted at construction, the missing-user path costs the same as
    /// the wrong-password path and response timing cannot reveal which
    /// usernames exist.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.dummy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a hasher with the cheapest supported cost parameters.
    fn low_cost_hasher() -> anyhow::Result<PasswordHasher> {
        let config = PasswordHasherConfig {
            hash_memory_kib: MIN_MEMORY_KIB,
            hash_iterations: MIN_ITERATIONS,
        };
        Ok(PasswordHasher::from_config(&config)?)
    }

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;
        let hash = hasher.hash_password("OpenSesame99!")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("OpenSesame99!", &hash).is_ok());
        assert!(hasher.verify_password("open_sesame_99", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;

        let first = hasher.hash_password("SamePasswordTwice1")?;
        let second = hasher.hash_password("SamePasswordTwice1")?;

        assert_ne!(first, second);
        assert!(hasher.verify_password("SamePasswordTwice1", &first).is_ok());
        assert!(hasher.verify_password("SamePasswordTwice1", &second).is_ok());

        Ok(())
    }

    #[test]
    fn configured_hasher_round_trips() -> anyhow::Result<()> {
        let config = PasswordHasherConfig {
            hash_memory_kib: MIN_MEMORY_KIB,
            hash_iterations: 1,
        };

        let hasher = PasswordHasher::from_config(&config)?;
        let hash = hasher.hash_password("configured_password")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("configured_password", &hash).is_ok());

        Ok(())
    }

    #[test]
    fn config_rejects_out_of_range_costs() {
        let too_little_memory = PasswordHasherConfig {
            hash_memory_kib: 64,
            hash_iterations: DEFAULT_ITERATIONS,
        };
        assert!(too_little_memory.validate().is_err());

        let too_many_iterations = PasswordHasherConfig {
            hash_memory_kib: DEFAULT_MEMORY_KIB,
            hash_iterations: 64,
        };
        assert!(too_many_iterations.validate().is_err());

        assert!(PasswordHasherConfig::default().validate().is_ok());
    }

    #[test]
    fn verify_password_returns_invalid_credentials_for_wrong_password() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;
        let hash = hasher.hash_password("correct_password")?;

        let result = hasher.verify_password("wrong_password", &hash);
        let error = result.expect_err("wrong password must fail verification");
        assert_eq!(error.kind(), ErrorKind::InvalidCredentials);

        Ok(())
    }

    #[test]
    fn verify_password_returns_error_for_invalid_hash() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;

        let result = hasher.verify_password("test_password", "invalid_hash_format");
        let error = result.expect_err("malformed hash must fail verification");
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        Ok(())
    }

    #[test]
    fn dummy_hash_is_minted_at_construction() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;
        assert!(hasher.dummy_hash.starts_with("$argon2id$"));

        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = low_cost_hasher()?;
        assert!(!hasher.verify_dummy_password("any_password"));
        assert!(!hasher.verify_dummy_password(""));

        Ok(())
    }
}

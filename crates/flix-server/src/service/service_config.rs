#[cfg(any(test, feature = "config"))]
use clap::Args;
use flix_store::{StoreClient, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::service::security::{
    AccessKeys, AccessKeysConfig, PasswordHasher, PasswordHasherConfig,
};
use crate::{Error, Result};

/// Everything [`ServiceState`] needs to come up: signing keys, hashing
/// costs, and the document store.
///
/// [`ServiceState`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Access token signing configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub access_keys: AccessKeysConfig,

    /// Password hashing cost configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub password_hasher: PasswordHasherConfig,

    /// Document store configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub store: StoreConfig,
}

impl ServiceConfig {
    /// Checks every section of the configuration before the server boots.
    ///
    /// # Errors
    ///
    /// Fails when the signing secret is too short, when the token lifetime
    /// or hashing costs fall outside their bounds, or when the document
    /// store limits do.
    pub fn validate(&self) -> Result<()> {
        self.access_keys.validate()?;
        self.password_hasher.validate()?;
        self.store.validate()?;

        Ok(())
    }

    /// Initializes the document store and loads seed data when configured.
    pub async fn connect_store(&self) -> Result<StoreClient> {
        let store_client = StoreClient::new_with_seed(self.store.clone())
            .await
            .map_err(|e| Error::store("Failed to initialize document store").with_source(e))?;

        Ok(store_client)
    }

    /// Derives access token signing keys and verifies they are usable.
    pub fn load_access_keys(&self) -> Result<AccessKeys> {
        let access_keys = AccessKeys::from_config(&self.access_keys)?;
        access_keys.validate_keys()?;

        Ok(access_keys)
    }

    /// Creates a password hasher with the configured cost parameters.
    pub fn create_password_hasher(&self) -> Result<PasswordHasher> {
        PasswordHasher::from_config(&self.password_hasher)
    }
}

#[cfg(debug_assertions)]
impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            access_keys: AccessKeysConfig::new("insecure-dev-secret-0123456789abcdef"),
            password_hasher: PasswordHasherConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

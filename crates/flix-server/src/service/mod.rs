//! Shared application state and its construction from configuration.

mod security;
mod service_config;

use flix_store::StoreClient;

pub use crate::service::security::{
    AccessKeys, AccessKeysConfig, PasswordHasher, PasswordHasherConfig,
};
pub use crate::service::service_config::ServiceConfig;
pub use crate::{Error, Result};

/// Everything handlers share: the store plus the security services.
///
/// Cloned per request by the [`State`] extractor; all fields are cheap
/// handles.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pub store: StoreClient,
    pub password_hasher: PasswordHasher,
    pub access_keys: AccessKeys,
}

impl ServiceState {
    /// Builds the state a running server needs.
    ///
    /// Opens (and optionally seeds) the document store, derives the token
    /// signing keys, and configures the password hasher, failing fast on
    /// the first invalid piece of configuration.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            store: service_config.connect_store().await?,
            password_hasher: service_config.create_password_hasher()?,
            access_keys: service_config.load_access_keys()?,
        })
    }
}

// Each service is extractable on its own via FromRef, so handlers can ask
// for exactly the dependency they need.
macro_rules! extractable {
    ($($field:ident => $service:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $service {
            fn from_ref(state: &ServiceState) -> Self {
                state.$field.clone()
            }
        }
    )+};
}

extractable!(store => StoreClient);
extractable!(password_hasher => PasswordHasher, access_keys => AccessKeys);

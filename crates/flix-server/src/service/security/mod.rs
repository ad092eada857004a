//! Password hashing and access token keys: the two services every
//! credential-touching handler shares.

mod access_keys;
mod password_hasher;

pub use access_keys::{AccessKeys, AccessKeysConfig};
pub use password_hasher::{PasswordHasher, PasswordHasherConfig};

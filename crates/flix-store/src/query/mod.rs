//! Document query repositories for all collections in the store.
//!
//! This module contains repository traits that provide high-level store
//! operations for users and movies, encapsulating the find/create/update/
//! delete-by-filter semantics behind type-safe interfaces.
//!
//! Every operation takes and returns owned documents; the collections behind
//! [`StoreClient`] are only touched under their per-collection locks, so each
//! call is atomic with respect to concurrent requests.
//!
//! [`StoreClient`]: crate::StoreClient

pub mod movie;
pub mod user;

pub use movie::MovieRepository;
pub use user::UserRepository;

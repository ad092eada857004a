//! Document models for all collections in the store.
//!
//! This module contains the typed documents for the `users` and `movies`
//! collections, including structs for querying, inserting, and updating
//! records.

mod movie;
mod user;

pub use movie::{Director, Movie, NewMovie};
pub use user::{NewUser, UpdateUser, User};

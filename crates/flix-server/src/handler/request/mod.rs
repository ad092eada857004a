//! Deserializable payloads the handlers accept.

mod movies;
mod users;

pub use movies::*;
pub use users::*;

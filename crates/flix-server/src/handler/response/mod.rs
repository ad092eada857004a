//! Serializable bodies the handlers return.

mod authentications;
mod error_response;
mod monitors;
mod movies;
mod users;

pub use authentications::*;
pub use error_response::*;
pub use monitors::*;
pub use movies::*;
pub use users::*;

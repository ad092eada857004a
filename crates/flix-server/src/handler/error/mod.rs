//! The HTTP error type handlers return, plus its [`Result`] alias.

mod http_error;
mod store_error;

pub use http_error::{Error, ErrorKind, Result};

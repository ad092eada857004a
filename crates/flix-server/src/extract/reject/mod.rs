//! Body and path extractors that reject with structured errors.
//!
//! Each wrapper deserializes like its axum counterpart but converts the
//! rejection into an [`Error`] payload that tells the client which part of
//! the request was wrong. [`ValidateJson`] additionally runs the payload's
//! validation rules after deserializing.
//!
//! [`Error`]: crate::handler::Error

pub mod enhanced_json;
pub mod enhanced_path;
pub mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::validated_json::ValidateJson;

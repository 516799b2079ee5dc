//! Shared types, protocol definitions, and errors for `gcm-seal` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;

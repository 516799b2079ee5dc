//! Base64 and hex transport encoding.
//!
//! Base64 uses the standard alphabet with padding; hex output is lowercase.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CryptoError;

/// Encode as standard padded Base64.
pub fn to_base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded Base64.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEncoding`] on any invalid character,
/// length or padding.
pub fn from_base64(text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(text)
        .map_err(|_| CryptoError::MalformedEncoding("base64"))
}

/// Encode as lowercase hex.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode hex text (either case).
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEncoding`] on odd length or non-hex digits.
pub fn from_hex(text: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(text).map_err(|_| CryptoError::MalformedEncoding("hex"))
}

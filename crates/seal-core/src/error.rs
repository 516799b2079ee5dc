//! Error type shared by every sealing primitive.

use thiserror::Error;

/// Errors produced by the crypto layer.
///
/// Tag mismatches are always reported as [`CryptoError::AuthenticationFailed`]
/// regardless of whether the key, nonce, tag or ciphertext was at fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// The operating system random source could not produce bytes.
    #[error("secure random source unavailable")]
    EntropyUnavailable,

    /// A transport-encoded field could not be decoded.
    #[error("malformed {0} encoding")]
    MalformedEncoding(&'static str),

    /// GCM tag verification failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Authenticated plaintext is not valid UTF-8.
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,

    /// The hash produced fewer bytes than the key needs.
    #[error("key derivation produced {got} bytes, need {need}")]
    DerivationError { got: usize, need: usize },

    /// The AEAD refused to seal the buffer (plaintext beyond the GCM limit).
    #[error("aead encryption failed")]
    EncryptionFailed,
}

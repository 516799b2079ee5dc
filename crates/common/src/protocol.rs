//! Request and response types exchanged over the public JSON API.
//!
//! Every binary value crosses the wire as text: Base64 for keys, payloads,
//! nonces and tags, lowercase hex for checksums.

use serde::{Deserialize, Serialize};

/// How a text field should be turned into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// The UTF-8 bytes of the string, unchanged.
    #[default]
    Utf8,
    /// Standard padded Base64.
    Base64,
    /// Hexadecimal, either case.
    Hex,
}

// ---------------------------------------------------------------------------
// Key derivation endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /keys/derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveKeyRequest {
    /// Master secret text.
    pub master_secret: String,
    /// Salt text. When absent the current Unix time in milliseconds is used.
    #[serde(default)]
    pub salt: Option<String>,
}

/// Successful response body for `POST /keys/derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveKeyResponse {
    /// Base64 of the 16-byte derived key.
    pub key: String,
    /// The salt that was actually used.
    pub salt: String,
}

// ---------------------------------------------------------------------------
// Encrypt / decrypt endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// UTF-8 text to encrypt.
    pub plaintext: String,
    /// Key text, interpreted according to `key_encoding`.
    pub key: String,
    /// Overrides the service's default key interpretation.
    #[serde(default)]
    pub key_encoding: Option<InputEncoding>,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Base64 ciphertext.
    pub payload: String,
    /// Base64 nonce.
    pub nonce: String,
    /// Base64 authentication tag.
    pub tag: String,
    /// SHA-256 hex digest of the plaintext, for out-of-band comparison.
    pub checksum: String,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Base64 ciphertext from a previous encrypt.
    pub payload: String,
    /// Base64 nonce; 12 bytes once decoded.
    pub nonce: String,
    /// Base64 authentication tag; 16 bytes once decoded.
    pub tag: String,
    /// Key text, interpreted according to `key_encoding`.
    pub key: String,
    /// Overrides the service's default key interpretation.
    #[serde(default)]
    pub key_encoding: Option<InputEncoding>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// The authenticated plaintext.
    pub plaintext: String,
    /// SHA-256 hex digest of the plaintext.
    pub checksum: String,
}

// ---------------------------------------------------------------------------
// Checksum endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /checksum`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumRequest {
    /// Data to hash, as text in `encoding`.
    pub data: String,
    #[serde(default)]
    pub encoding: InputEncoding,
    /// Hex digest to compare against, in either case.
    #[serde(default)]
    pub expected: Option<String>,
}

/// Successful response body for `POST /checksum`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumResponse {
    /// Lowercase hex SHA-256 digest.
    pub checksum: String,
    /// Whether `checksum` equals the request's `expected` digest. Omitted
    /// when no digest was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<bool>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running service.
    pub version: String,
}

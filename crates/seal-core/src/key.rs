//! [`Key`]: owned symmetric key bytes that are wiped on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::error::CryptoError;

/// Byte length of an AES-128 key, the size produced by key derivation.
pub const KEY_LEN: usize = 16;

/// Symmetric key material.
///
/// The length is not checked here; the cipher rejects anything other than
/// 16, 24 or 32 bytes when it is initialised. When this value is dropped the
/// buffer is overwritten with zeroes.
///
/// There is no `PartialEq`; compare [`Key::as_bytes`] where equality is needed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key(Vec<u8>);

impl Key {
    /// Copy raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Use the UTF-8 bytes of `text` as the key, unchanged.
    ///
    /// This is how key strings have always been consumed by `encrypt` and
    /// `decrypt`; only a string whose UTF-8 form is 16, 24 or 32 bytes long
    /// yields a usable key.
    pub fn from_utf8(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }

    /// Decode a Base64 key string, such as the output of [`Key::to_base64`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEncoding`] if `text` is not valid Base64.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        codec::from_base64(text)
            .map(Self)
            .map_err(|_| CryptoError::MalformedEncoding("key"))
    }

    /// Decode a hex key string.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEncoding`] if `text` is not valid hex.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        codec::from_hex(text)
            .map(Self)
            .map_err(|_| CryptoError::MalformedEncoding("key"))
    }

    /// The raw key bytes, as passed to the cipher.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard padded Base64 of the key bytes.
    pub fn to_base64(&self) -> String {
        codec::to_base64(&self.0)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        write!(f, "Key([REDACTED; {} bytes])", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_key_keeps_raw_bytes() {
        let key = Key::from_utf8("0123456789abcdef");
        assert_eq!(key.len(), KEY_LEN);
        assert_eq!(key.as_bytes(), b"0123456789abcdef");
    }

    #[test]
    fn base64_round_trip() {
        let key = Key::from_bytes(&[0x42u8; KEY_LEN]);
        let encoded = key.to_base64();
        assert_eq!(encoded.len(), 24);
        assert_eq!(Key::from_base64(&encoded).unwrap().as_bytes(), key.as_bytes());
    }

    #[test]
    fn bad_encodings_name_the_key() {
        assert_eq!(
            Key::from_base64("%%%").err(),
            Some(CryptoError::MalformedEncoding("key"))
        );
        assert_eq!(
            Key::from_hex("xyz").err(),
            Some(CryptoError::MalformedEncoding("key"))
        );
    }

    #[test]
    fn hex_key_decodes() {
        let key = Key::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(key.as_bytes()[15], 0x0f);
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = Key::from_utf8("super secret key");
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("secret"));
    }
}

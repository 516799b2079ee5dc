//! Key derivation: SHA-256 over `master_secret ‖ salt`, truncated to 16 bytes.
//!
//! This is a single hash, not a password KDF. Distinct keys rely entirely on
//! callers passing a distinct salt (conventionally a millisecond timestamp).

use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::key::{Key, KEY_LEN};

/// Derive a [`KEY_LEN`]-byte key from a master secret and a salt.
///
/// The UTF-8 bytes of `master_secret` are followed directly by those of
/// `salt` with no separator. Identical inputs always give identical keys.
///
/// # Errors
///
/// Returns [`CryptoError::DerivationError`] if the digest is shorter than
/// [`KEY_LEN`] bytes.
pub fn derive_key(master_secret: &str, salt: &str) -> Result<Key, CryptoError> {
    let mut hasher = Sha256::new();
    hasher.update(master_secret.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();

    let truncated = digest.get(..KEY_LEN).ok_or(CryptoError::DerivationError {
        got: digest.len(),
        need: KEY_LEN,
    })?;
    Ok(Key::from_bytes(truncated))
}

/// The current Unix time in milliseconds, rendered as decimal text.
///
/// A clock set before 1970 yields `"0"`.
pub fn timestamp_salt() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key("secretA", "1700000000").unwrap();
        let b = derive_key("secretA", "1700000000").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.len(), KEY_LEN);
    }

    #[test]
    fn different_salt_gives_different_key() {
        let a = derive_key("secretA", "1700000000").unwrap();
        let b = derive_key("secretA", "1700000001").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn key_is_sha256_prefix_of_concatenation() {
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223...
        let key = derive_key("ab", "c").unwrap();
        assert_eq!(codec::to_hex(key.as_bytes()), "ba7816bf8f01cfea414140de5dae2223");
    }

    #[test]
    fn no_separator_between_secret_and_salt() {
        let joined = derive_key("ab", "c").unwrap();
        let split = derive_key("a", "bc").unwrap();
        assert_eq!(joined.as_bytes(), split.as_bytes());
    }

    #[test]
    fn timestamp_salt_is_numeric_milliseconds() {
        let salt = timestamp_salt();
        let millis: u128 = salt.parse().unwrap();
        // Later than 2023-11-14, so certainly milliseconds rather than seconds.
        assert!(millis > 1_700_000_000_000);
    }
}

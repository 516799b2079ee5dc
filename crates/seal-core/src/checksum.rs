//! SHA-256 checksums rendered as lowercase hex.
//!
//! These are independent of the GCM tag and are meant for out-of-band
//! comparison, e.g. checking that a decrypted message matches the original.

use sha2::{Digest, Sha256};

use crate::codec;

/// SHA-256 of `data` as 64 lowercase hex characters.
pub fn checksum(data: &[u8]) -> String {
    codec::to_hex(Sha256::digest(data))
}

/// Returns `true` if `expected_hex` is the checksum of `data`, ignoring case.
pub fn verify_checksum(data: &[u8], expected_hex: &str) -> bool {
    checksum(data).eq_ignore_ascii_case(expected_hex.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abc_matches_known_digest() {
        assert_eq!(
            checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_input_matches_known_digest() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_accepts_uppercase() {
        assert!(verify_checksum(
            b"abc",
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        ));
        assert!(!verify_checksum(b"abd", &checksum(b"abc")));
    }
}

//! AES-GCM encryption and decryption of text messages.
//!
//! **Nonces:** every call to [`encrypt`] draws a fresh 96-bit nonce from the
//! OS CSPRNG. Nonces are never accepted from callers on the encrypt side.
//! GCM nonce reuse under one key is catastrophic — it breaks both
//! confidentiality and authentication.
//!
//! **Key sizes:** the key length selects the variant: 16 bytes → AES-128,
//! 24 → AES-192, 32 → AES-256. Anything else is rejected before any
//! ciphertext is produced.
//!
//! Associated data is always empty.

use aes_gcm::{
    aead::{
        consts::{U12, U16},
        AeadInPlace, KeyInit,
    },
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce, Tag,
};

use crate::codec;
use crate::error::CryptoError;
use crate::random::{OsRandom, RandomSource};

/// Byte length of a GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of a GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

const NO_AAD: &[u8] = b"";

type Aes192Gcm = AesGcm<Aes192, U12>;

/// The output of [`encrypt`]: three independently Base64-encoded fields.
///
/// The fields travel separately; all three are needed to decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Base64 ciphertext, exactly as long as the plaintext before encoding.
    pub payload: String,
    /// Base64 of the 12-byte nonce.
    pub nonce: String,
    /// Base64 of the 16-byte tag.
    pub tag: String,
}

/// Encrypt `plaintext` with AES-GCM under `key` using a fresh OS-random nonce.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// Returns [`CryptoError::EntropyUnavailable`] if no nonce could be drawn.
pub fn encrypt(plaintext: &str, key: &[u8]) -> Result<Envelope, CryptoError> {
    encrypt_with(plaintext, key, &OsRandom)
}

/// Encrypt `plaintext` drawing the nonce from `source`.
///
/// # Errors
///
/// Same as [`encrypt`], plus whatever error `source` reports.
pub fn encrypt_with(
    plaintext: &str,
    key: &[u8],
    source: &dyn RandomSource,
) -> Result<Envelope, CryptoError> {
    let cipher = GcmCipher::new(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    source.fill(&mut nonce_bytes)?;

    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher.seal(&nonce_bytes, &mut buffer)?;

    Ok(Envelope {
        payload: codec::to_base64(&buffer),
        nonce: codec::to_base64(nonce_bytes),
        tag: codec::to_base64(tag),
    })
}

/// Authenticate and decrypt the three Base64 fields produced by [`encrypt`].
///
/// # Errors
///
/// - [`CryptoError::MalformedEncoding`] if any field is not valid Base64.
/// - [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// - [`CryptoError::AuthenticationFailed`] if the tag does not verify. This
///   covers a wrong key, a wrong or truncated nonce or tag, and any change
///   to the ciphertext.
/// - [`CryptoError::InvalidUtf8`] if the authenticated bytes are not UTF-8.
pub fn decrypt(
    payload_b64: &str,
    key: &[u8],
    nonce_b64: &str,
    tag_b64: &str,
) -> Result<String, CryptoError> {
    let mut buffer =
        codec::from_base64(payload_b64).map_err(|_| CryptoError::MalformedEncoding("payload"))?;
    let nonce =
        codec::from_base64(nonce_b64).map_err(|_| CryptoError::MalformedEncoding("nonce"))?;
    let tag = codec::from_base64(tag_b64).map_err(|_| CryptoError::MalformedEncoding("tag"))?;

    let cipher = GcmCipher::new(key)?;

    // A nonce or tag of the wrong size can never verify; report it the same
    // way as any other mismatch.
    let nonce: [u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    let tag: [u8; TAG_LEN] = tag
        .try_into()
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    cipher.open(&nonce, &mut buffer, &tag)?;

    String::from_utf8(buffer).map_err(|_| CryptoError::InvalidUtf8)
}

/// Decrypt an [`Envelope`] under `key`. See [`decrypt`].
pub fn decrypt_envelope(envelope: &Envelope, key: &[u8]) -> Result<String, CryptoError> {
    decrypt(&envelope.payload, key, &envelope.nonce, &envelope.tag)
}

/// AES-GCM keyed for one of the three AES key sizes.
enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl GcmCipher {
    fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            other => Err(CryptoError::InvalidKeyLength(other)),
        }
    }

    /// Encrypt `buffer` in place and return the detached tag.
    fn seal(
        &self,
        nonce: &[u8; NONCE_LEN],
        buffer: &mut [u8],
    ) -> Result<[u8; TAG_LEN], CryptoError> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let tag = match self {
            Self::Aes128(c) => c.encrypt_in_place_detached(nonce, NO_AAD, buffer),
            Self::Aes192(c) => c.encrypt_in_place_detached(nonce, NO_AAD, buffer),
            Self::Aes256(c) => c.encrypt_in_place_detached(nonce, NO_AAD, buffer),
        }
        .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut out = [0u8; TAG_LEN];
        out.copy_from_slice(&tag);
        Ok(out)
    }

    /// Verify `tag` and decrypt `buffer` in place. On failure `buffer` holds
    /// no plaintext.
    fn open(
        &self,
        nonce: &[u8; NONCE_LEN],
        buffer: &mut [u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<(), CryptoError> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let tag = Tag::<U16>::from_slice(tag);
        match self {
            Self::Aes128(c) => c.decrypt_in_place_detached(nonce, NO_AAD, buffer, tag),
            Self::Aes192(c) => c.decrypt_in_place_detached(nonce, NO_AAD, buffer, tag),
            Self::Aes256(c) => c.decrypt_in_place_detached(nonce, NO_AAD, buffer, tag),
        }
        .map_err(|_| CryptoError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::derive_key;
    use crate::random::{random_bytes, MockRandomSource};

    fn random_key(len: usize) -> Vec<u8> {
        random_bytes(len).unwrap()
    }

    fn zero_nonce_source() -> MockRandomSource {
        let mut source = MockRandomSource::new();
        source.expect_fill().returning(|dest| {
            dest.fill(0);
            Ok(())
        });
        source
    }

    fn flip_bit(b64: &str, bit: usize) -> String {
        let mut bytes = codec::from_base64(b64).unwrap();
        bytes[bit / 8] ^= 1 << (bit % 8);
        codec::to_base64(bytes)
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key(16);
        let env = encrypt("123-45-6789", &key).unwrap();
        assert_eq!(decrypt_envelope(&env, &key).unwrap(), "123-45-6789");
    }

    #[test]
    fn round_trip_all_key_sizes() {
        for len in [16, 24, 32] {
            let key = random_key(len);
            let env = encrypt("héllo wörld ✓", &key).unwrap();
            assert_eq!(decrypt_envelope(&env, &key).unwrap(), "héllo wörld ✓");
        }
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let key = random_key(16);
        let env = encrypt("", &key).unwrap();
        assert_eq!(env.payload, "");
        assert_eq!(decrypt_envelope(&env, &key).unwrap(), "");
    }

    #[test]
    fn field_sizes() {
        let key = random_key(16);
        let plaintext = "a message of some length ü";
        let env = encrypt(plaintext, &key).unwrap();
        assert_eq!(
            codec::from_base64(&env.payload).unwrap().len(),
            plaintext.len()
        );
        assert_eq!(codec::from_base64(&env.nonce).unwrap().len(), NONCE_LEN);
        assert_eq!(codec::from_base64(&env.tag).unwrap().len(), TAG_LEN);
    }

    #[test]
    fn invalid_key_length_rejected() {
        for len in [0, 15, 17, 31, 33] {
            let key = vec![0u8; len];
            assert_eq!(
                encrypt("x", &key),
                Err(CryptoError::InvalidKeyLength(len))
            );
        }
    }

    #[test]
    fn invalid_key_length_draws_no_nonce() {
        let mut source = MockRandomSource::new();
        source.expect_fill().never();
        assert_eq!(
            encrypt_with("x", b"short", &source),
            Err(CryptoError::InvalidKeyLength(5))
        );
    }

    #[test]
    fn entropy_failure_is_propagated() {
        let mut source = MockRandomSource::new();
        source
            .expect_fill()
            .times(1)
            .returning(|_| Err(CryptoError::EntropyUnavailable));
        assert_eq!(
            encrypt_with("x", &[0u8; 16], &source),
            Err(CryptoError::EntropyUnavailable)
        );
    }

    // NIST GCM test cases 1 and 2: AES-128, zero key, zero IV, no AAD.
    #[test]
    fn known_answer_empty_plaintext() {
        let env = encrypt_with("", &[0u8; 16], &zero_nonce_source()).unwrap();
        assert_eq!(env.payload, "");
        assert_eq!(
            codec::to_hex(codec::from_base64(&env.tag).unwrap()),
            "58e2fccefa7e3061367f1d57a4e7455a"
        );
    }

    #[test]
    fn known_answer_zero_block() {
        let plaintext = "\0".repeat(16);
        let env = encrypt_with(&plaintext, &[0u8; 16], &zero_nonce_source()).unwrap();
        assert_eq!(
            codec::to_hex(codec::from_base64(&env.payload).unwrap()),
            "0388dace60b6a392f328c2b971b2fe78"
        );
        assert_eq!(
            codec::to_hex(codec::from_base64(&env.tag).unwrap()),
            "ab6e47d42cec13bdf53a67b21257bddf"
        );
        assert_eq!(env.nonce, codec::to_base64([0u8; NONCE_LEN]));
        assert_eq!(decrypt_envelope(&env, &[0u8; 16]).unwrap(), plaintext);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let key1 = random_key(16);
        let key2 = random_key(16);
        let env = encrypt("secret", &key1).unwrap();
        assert_eq!(
            decrypt_envelope(&env, &key2),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn every_single_bit_flip_is_rejected() {
        let key = random_key(16);
        let env = encrypt("tamper me", &key).unwrap();

        for bit in 0..("tamper me".len() * 8) {
            let tampered = Envelope {
                payload: flip_bit(&env.payload, bit),
                ..env.clone()
            };
            assert_eq!(
                decrypt_envelope(&tampered, &key),
                Err(CryptoError::AuthenticationFailed)
            );
        }
        for bit in 0..(NONCE_LEN * 8) {
            let tampered = Envelope {
                nonce: flip_bit(&env.nonce, bit),
                ..env.clone()
            };
            assert_eq!(
                decrypt_envelope(&tampered, &key),
                Err(CryptoError::AuthenticationFailed)
            );
        }
        for bit in 0..(TAG_LEN * 8) {
            let tampered = Envelope {
                tag: flip_bit(&env.tag, bit),
                ..env.clone()
            };
            assert_eq!(
                decrypt_envelope(&tampered, &key),
                Err(CryptoError::AuthenticationFailed)
            );
        }
    }

    #[test]
    fn truncated_nonce_or_tag_fails_auth() {
        let key = random_key(16);
        let env = encrypt("hello", &key).unwrap();
        let short_tag = codec::to_base64(&codec::from_base64(&env.tag).unwrap()[..12]);
        assert_eq!(
            decrypt(&env.payload, &key, &env.nonce, &short_tag),
            Err(CryptoError::AuthenticationFailed)
        );
        let short_nonce = codec::to_base64(&codec::from_base64(&env.nonce).unwrap()[..8]);
        assert_eq!(
            decrypt(&env.payload, &key, &short_nonce, &env.tag),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn nonces_are_fresh_per_call() {
        let key = random_key(16);
        let a = encrypt("same message", &key).unwrap();
        let b = encrypt("same message", &key).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.payload, b.payload);
        assert_ne!(a.tag, b.tag);
    }

    #[test]
    fn malformed_fields_are_named() {
        let key = random_key(16);
        let env = encrypt("hello", &key).unwrap();
        assert_eq!(
            decrypt("not-base64!!", &key, &env.nonce, &env.tag),
            Err(CryptoError::MalformedEncoding("payload"))
        );
        assert_eq!(
            decrypt(&env.payload, &key, "???", &env.tag),
            Err(CryptoError::MalformedEncoding("nonce"))
        );
        assert_eq!(
            decrypt(&env.payload, &key, &env.nonce, "%"),
            Err(CryptoError::MalformedEncoding("tag"))
        );
    }

    #[test]
    fn decrypt_rejects_bad_key_length() {
        let env = encrypt("hello", &random_key(16)).unwrap();
        assert_eq!(
            decrypt_envelope(&env, b"too short"),
            Err(CryptoError::InvalidKeyLength(9))
        );
    }

    #[test]
    fn authenticated_non_utf8_is_reported() {
        // Build a valid envelope around bytes that are not UTF-8.
        let key = [7u8; 16];
        let cipher = GcmCipher::new(&key).unwrap();
        let nonce = [1u8; NONCE_LEN];
        let mut buffer = vec![0xff, 0xfe, 0xfd];
        let tag = cipher.seal(&nonce, &mut buffer).unwrap();
        assert_eq!(
            decrypt(
                &codec::to_base64(&buffer),
                &key,
                &codec::to_base64(nonce),
                &codec::to_base64(tag),
            ),
            Err(CryptoError::InvalidUtf8)
        );
    }

    #[test]
    fn end_to_end_with_derived_key() {
        let key = derive_key("MySecretMasterKey", "1700000000000").unwrap();
        let message = r#"{"message":"Hello World"}"#;
        let env = encrypt(message, key.as_bytes()).unwrap();
        assert_eq!(
            decrypt(&env.payload, key.as_bytes(), &env.nonce, &env.tag).unwrap(),
            message
        );
    }

    #[test]
    fn raw_utf8_key_string_works_when_sixteen_bytes() {
        let key = crate::Key::from_utf8("0123456789abcdef");
        let env = encrypt("compat", key.as_bytes()).unwrap();
        assert_eq!(decrypt_envelope(&env, key.as_bytes()).unwrap(), "compat");
    }
}

//! AES-GCM sealing primitives for `gcm-seal`.
//!
//! This crate is intentionally free of HTTP and async dependencies. Every
//! operation is a stateless function: nothing is cached between calls and
//! every function is safe to call from many threads at once.
//!
//! # Envelope format
//!
//! ```text
//! payload = base64(ciphertext)   // same length as the UTF-8 plaintext
//! nonce   = base64(12 bytes)     // fresh per encryption
//! tag     = base64(16 bytes)     // GCM tag, empty associated data
//! ```
//!
//! The three fields are independent strings; there is no combined wire format.

pub mod checksum;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod kdf;
pub mod key;
pub mod random;

pub use checksum::{checksum, verify_checksum};
pub use cipher::{decrypt, decrypt_envelope, encrypt, encrypt_with, Envelope, NONCE_LEN, TAG_LEN};
pub use error::CryptoError;
pub use kdf::{derive_key, timestamp_salt};
pub use key::{Key, KEY_LEN};
pub use random::{random_bytes, OsRandom, RandomSource};

//! Cryptographically secure random bytes for nonces.
//!
//! [`OsRandom`] reads straight from the operating system CSPRNG on every
//! call. There is no user-space generator state to seed, share or reseed, so a
//! single value can serve any number of threads concurrently.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::error::CryptoError;

/// A source of unpredictable bytes.
///
/// The seam exists so callers can substitute a deterministic source in tests;
/// production code uses [`OsRandom`].
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EntropyUnavailable`] if no bytes could be produced.
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// The operating system CSPRNG (`getrandom` under the hood).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| CryptoError::EntropyUnavailable)
    }
}

/// Return `length` fresh bytes from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`CryptoError::EntropyUnavailable`] if the OS generator fails.
pub fn random_bytes(length: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; length];
    OsRandom.fill(&mut buf)?;
    Ok(buf)
}

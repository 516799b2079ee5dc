//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::protocol::InputEncoding;
use seal_core::{OsRandom, RandomSource};

/// Application state shared across all request handlers.
///
/// Holds no mutable data: every sealing operation is stateless, so the state
/// only carries the nonce source and configured defaults.
#[derive(Clone)]
pub struct AppState {
    /// Where encryption nonces come from.
    pub random: Arc<dyn RandomSource + Send + Sync>,
    /// Key interpretation used when a request does not specify one.
    pub default_key_encoding: InputEncoding,
}

impl AppState {
    /// Create a new [`AppState`] backed by the OS random source.
    pub fn new(default_key_encoding: InputEncoding) -> Self {
        Self {
            random: Arc::new(OsRandom),
            default_key_encoding,
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with raw UTF-8 key handling, suitable for tests.
    fn default() -> Self {
        Self::new(InputEncoding::Utf8)
    }
}

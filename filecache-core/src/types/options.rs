//! Per-store options.

use serde::{Deserialize, Serialize};

/// Encoding flags fixed at store construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Serialize values as JSON and suffix file names with `.json`.
    pub encode_json: bool,
    /// Reserved for compressed storage; currently has no effect.
    pub compress: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            encode_json: true,
            compress: true,
        }
    }
}

impl StoreOptions {
    /// Options for a store holding raw, unencoded files.
    pub fn raw() -> Self {
        Self {
            encode_json: false,
            ..Self::default()
        }
    }
}

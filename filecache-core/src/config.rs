//! Store configuration loaded from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIR_NAME, ENV_DEFAULT_TTL, ENV_DIR, ENV_JSON};
use crate::types::{StoreOptions, Ttl};

/// Configuration for building a store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Absolute base directory for entries
    pub base_dir: PathBuf,
    /// Whether values are JSON-encoded
    pub encode_json: bool,
    /// Reserved compression flag
    pub compress: bool,
    /// TTL applied by hosts when the caller gives none (e.g. `1h`)
    pub default_ttl: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let options = StoreOptions::default();
        Self {
            base_dir: std::env::temp_dir().join(DEFAULT_DIR_NAME),
            encode_json: options.encode_json,
            compress: options.compress,
            default_ttl: None,
        }
    }
}

impl StoreConfig {
    /// Builds a configuration from the environment, loading `.env` if present.
    ///
    /// Unset variables fall back to [`StoreConfig::default`].
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            base_dir: std::env::var(ENV_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.base_dir),
            encode_json: std::env::var(ENV_JSON)
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.encode_json),
            compress: defaults.compress,
            default_ttl: std::env::var(ENV_DEFAULT_TTL)
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Returns the store options described by this configuration.
    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            encode_json: self.encode_json,
            compress: self.compress,
        }
    }

    /// Returns the default TTL, if one is configured.
    pub fn default_ttl(&self) -> Option<Ttl> {
        self.default_ttl.as_deref().map(Ttl::from)
    }
}

//! # filecache core
//!
//! Core types, errors, and collaborators for the filecache key-value store.
//!
//! This crate provides the building blocks shared by the store and the CLI:
//!
//! - **Types**: freshness outcomes, TTL values, raw payloads, store options
//! - **Errors**: the store's error taxonomy
//! - **Constants**: on-disk conventions (suffix, hidden prefix, fan-out)
//! - **Duration**: strict `<integer><unit>` duration parsing
//! - **Hash**: content fingerprints for memoization keys
//! - **Config**: environment-driven store configuration
//! - **Traits**: the injectable [`Clock`]
//!
//! ## Example
//!
//! ```rust
//! use filecache_core::{parse_duration, Ttl};
//! use std::time::Duration;
//!
//! assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
//! assert_eq!(Ttl::from("1h").resolve().unwrap(), Duration::from_secs(3600));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod duration;
pub mod error;
pub mod fs;
pub mod hash;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use config::StoreConfig;
pub use constants::*;
pub use duration::parse_duration;
pub use error::{FileCacheError, Result};
pub use fs::ensure_dir;
pub use hash::fingerprint;
pub use traits::*;
pub use types::*;

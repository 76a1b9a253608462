//! # filecache store
//!
//! A filesystem-backed key-value store. Each entry is one regular file under
//! the store's base directory; freshness is derived from the file's
//! modification time at read time, so nothing but the payload is persisted.
//!
//! - **Namespace store**: [`FileStore`] owns a base directory and can hand
//!   out sub-stores rooted at nested directories
//! - **Record access**: `get`/`put`/`remove`/`list`/`clear`, plus streaming
//!   reads through [`EntryStream`]
//! - **Memoization**: [`Memoized`] caches the results of an async function
//!   keyed by a fingerprint of its arguments
//!
//! ## Example
//!
//! ```rust,ignore
//! use filecache_store::FileStore;
//!
//! let store = FileStore::new("/tmp/x")?;
//! store.put("foo", &serde_json::json!({ "foo": 42 })).await?;
//!
//! let hit: Option<serde_json::Value> = store.get("foo", Some("1h".into())).await?;
//! let miss: Option<serde_json::Value> = store.get("foo2", None).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod access;
mod memo;
mod meta;
mod store;
mod stream;

pub use memo::{MemoError, Memoized};
pub use store::FileStore;
pub use stream::EntryStream;

pub use filecache_core::{FileCacheError, Freshness, Payload, Result, StoreOptions, Ttl};

//! Memoization of async computations on top of a store.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use filecache_core::constants::MEMO_KEY_SEPARATOR;
use filecache_core::error::{FileCacheError, Result};
use filecache_core::hash::fingerprint;
use filecache_core::types::Ttl;

use crate::FileStore;

/// Error from a memoized call.
#[derive(Debug, Error)]
pub enum MemoError<E> {
    /// The cache itself failed.
    #[error("cache error: {0}")]
    Store(#[from] FileCacheError),
    /// The wrapped computation failed.
    #[error("computation failed: {0}")]
    Inner(E),
}

/// An async function whose non-`None` results are cached in a store.
///
/// Keys are `namespace-<fingerprint of the JSON-encoded arguments>`, so two
/// wrappers sharing a namespace share results. Pass the arguments of
/// multi-argument functions as a tuple.
pub struct Memoized<F> {
    store: FileStore,
    namespace: String,
    ttl: Option<Ttl>,
    func: F,
}

impl FileStore {
    /// Wraps `func` so its results are cached under `namespace` for `ttl`.
    ///
    /// A string TTL is parsed here, so a malformed one fails immediately.
    pub fn memoize<F>(
        &self,
        namespace: impl Into<String>,
        func: F,
        ttl: Option<Ttl>,
    ) -> Result<Memoized<F>> {
        let namespace = namespace.into();
        if namespace.is_empty() || namespace.contains(['/', '\\']) {
            return Err(FileCacheError::InvalidConfig(format!(
                "memo namespace must be a non-empty file name, got \"{namespace}\""
            )));
        }
        let ttl = ttl.map(Ttl::parsed).transpose()?;

        Ok(Memoized {
            store: self.clone(),
            namespace,
            ttl,
            func,
        })
    }
}

impl<F> Memoized<F> {
    /// Returns the cache key used for `args`.
    ///
    /// Arguments pass through [`serde_json::Value`] first so map entries are
    /// fingerprinted in sorted key order, whatever their iteration order.
    pub fn key_for<A: Serialize>(&self, args: &A) -> Result<String> {
        let encoded = serde_json::to_vec(&serde_json::to_value(args)?)?;
        Ok(format!(
            "{}{}{}",
            self.namespace,
            MEMO_KEY_SEPARATOR,
            fingerprint(&encoded)
        ))
    }

    /// Returns the namespace keys are prefixed with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the store results are cached in.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Returns a cached result for `args`, or computes and caches one.
    ///
    /// `func` is not invoked on a hit. `None` results, and values that
    /// serialize to JSON `null`, are returned but never cached, so they are
    /// recomputed on every call.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn call<A, R, E, Fut>(&self, args: A) -> std::result::Result<Option<R>, MemoError<E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<Option<R>, E>>,
        A: Serialize,
        R: Serialize + DeserializeOwned,
    {
        let key = self.key_for(&args)?;
        if let Some(hit) = self.store.get::<R>(&key, self.ttl.clone()).await? {
            debug!(%key, "Memo hit");
            return Ok(Some(hit));
        }

        debug!(%key, "Memo miss");
        let result = (self.func)(args).await.map_err(MemoError::Inner)?;
        if let Some(value) = &result {
            let encoded = serde_json::to_value(value).map_err(FileCacheError::from)?;
            if encoded.is_null() {
                debug!(%key, "Null result not cached");
            } else {
                self.store.put(&key, &encoded).await?;
            }
        }
        Ok(result)
    }
}

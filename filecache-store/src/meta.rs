//! Metadata-only queries: existence, age, size.

use std::io::ErrorKind;
use std::time::SystemTime;

use tokio::fs;
use tracing::{instrument, trace};

use filecache_core::error::Result;
use filecache_core::types::{Freshness, Ttl};

use crate::FileStore;

impl FileStore {
    /// Returns the entry's modification time, or `None` if it does not exist.
    ///
    /// Errors other than not-found propagate.
    pub async fn modified(&self, id: &str) -> Result<Option<SystemTime>> {
        match fs::metadata(self.resolve(id)).await {
            Ok(meta) => Ok(Some(meta.modified()?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns true if an entry file exists, regardless of age.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.modified(id).await?.is_some())
    }

    /// Returns the entry's size in bytes, or `None` if it cannot be read.
    pub async fn size_of(&self, id: &str) -> Option<u64> {
        fs::metadata(self.resolve(id)).await.ok().map(|meta| meta.len())
    }

    /// Checks the entry against an optional expiry window.
    ///
    /// A string TTL is only parsed once the entry is known to exist.
    #[instrument(skip(self), level = "trace")]
    pub async fn check_freshness(&self, id: &str, ttl: Option<Ttl>) -> Result<Freshness> {
        let Some(modified) = self.modified(id).await? else {
            return Ok(Freshness::Absent);
        };
        let ttl = ttl.as_ref().map(Ttl::resolve).transpose()?;
        let freshness = Freshness::classify(modified, self.clock.now(), ttl);
        trace!(%freshness, "Checked entry");
        Ok(freshness)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use filecache_core::error::FileCacheError;
    use filecache_core::traits::ManualClock;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_absent_entry() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(store.modified("nope").await.unwrap().is_none());
        assert!(!store.exists("nope").await.unwrap());
        assert!(store.size_of("nope").await.is_none());
        assert_eq!(store.check_freshness("nope", None).await.unwrap(), Freshness::Absent);
    }

    #[tokio::test]
    async fn test_size_and_existence() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("foo.json"), b"{\"a\":1}").await.unwrap();

        assert!(store.exists("foo").await.unwrap());
        assert_eq!(store.size_of("foo").await, Some(7));
        assert_eq!(store.check_freshness("foo", None).await.unwrap(), Freshness::Fresh);
    }

    #[tokio::test]
    async fn test_freshness_with_manual_clock() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::starting_now());
        let store = FileStore::new(dir.path()).unwrap().with_clock(clock.clone());
        fs::write(dir.path().join("foo.json"), b"1").await.unwrap();

        assert_eq!(
            store.check_freshness("foo", Some("1h".into())).await.unwrap(),
            Freshness::Fresh
        );

        clock.advance(Duration::from_secs(2 * 3600));
        assert_eq!(
            store.check_freshness("foo", Some("1h".into())).await.unwrap(),
            Freshness::Expired
        );
        // Without a TTL, existence alone is enough
        assert_eq!(store.check_freshness("foo", None).await.unwrap(), Freshness::Fresh);
    }

    #[tokio::test]
    async fn test_bad_ttl_fails_only_for_existing_entry() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(
            store.check_freshness("nope", Some("later".into())).await.unwrap(),
            Freshness::Absent
        );

        fs::write(dir.path().join("foo.json"), b"1").await.unwrap();
        let err = store.check_freshness("foo", Some("later".into())).await.unwrap_err();
        assert!(matches!(err, FileCacheError::InvalidDuration { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_not_found_errors_propagate() {
        let dir = tempdir().unwrap();
        let store =
            FileStore::with_options(dir.path(), filecache_core::StoreOptions::raw()).unwrap();
        fs::write(dir.path().join("plain"), b"x").await.unwrap();

        // A path through a regular file is ENOTDIR, not ENOENT
        let result = store.modified("plain/child").await;
        assert!(matches!(result, Err(FileCacheError::IoError(_))));
        assert!(store.size_of("plain/child").await.is_none());
    }
}

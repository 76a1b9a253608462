//! The store handle: base directory, options, and path resolution.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use filecache_core::constants::JSON_SUFFIX;
use filecache_core::error::{FileCacheError, Result};
use filecache_core::traits::{Clock, SystemClock};
use filecache_core::types::StoreOptions;
use filecache_core::ensure_dir;

/// Filesystem-backed key-value store.
///
/// A `FileStore` is configuration, not state: it holds an absolute base
/// directory, its [`StoreOptions`], and the clock used for expiry checks.
/// Cloning is cheap and every clone addresses the same files.
///
/// # Layout
///
/// ```text
/// base/
///   foo.json        entry "foo" (JSON-encoded)
///   .hidden.json    never listed
///   sub/            sub-store created with `sub("sub")`
/// ```
///
/// # Concurrency
///
/// No locking is performed. Concurrent writes to the same id are
/// last-writer-wins at the filesystem level.
#[derive(Clone)]
pub struct FileStore {
    /// Absolute base directory
    base: PathBuf,
    /// Encoding flags
    options: StoreOptions,
    /// Time source for freshness checks
    pub(crate) clock: Arc<dyn Clock>,
}

impl FileStore {
    /// Creates a JSON-encoding store rooted at `base`.
    ///
    /// `base` must be absolute; it is created (with parents) if missing.
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(base, StoreOptions::default())
    }

    /// Creates a store with explicit options.
    pub fn with_options(base: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        Self::build(base.as_ref(), options, Arc::new(SystemClock))
    }

    fn build(base: &Path, options: StoreOptions, clock: Arc<dyn Clock>) -> Result<Self> {
        if !base.is_absolute() {
            return Err(FileCacheError::InvalidConfig(format!(
                "absolute path to base directory required, got \"{}\"",
                base.display()
            )));
        }
        ensure_dir(base)?;
        debug!(base = ?base, json = options.encode_json, "Opened file store");

        Ok(Self {
            base: base.to_path_buf(),
            options,
            clock,
        })
    }

    /// Replaces the clock used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a sub-store at `base/relative`, inheriting this store's options.
    pub fn sub(&self, relative: impl AsRef<Path>) -> Result<Self> {
        self.sub_with(relative, self.options)
    }

    /// Creates a sub-store at `base/relative` with its own options.
    ///
    /// The sub-store shares this store's clock.
    pub fn sub_with(&self, relative: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let relative = relative.as_ref();
        if relative.as_os_str().is_empty() || relative.has_root() {
            return Err(FileCacheError::InvalidPath(format!(
                "relative path to base directory required, got \"{}\"",
                relative.display()
            )));
        }
        Self::build(&self.base.join(relative), options, Arc::clone(&self.clock))
    }

    /// Maps an entry id to its file path.
    ///
    /// With JSON encoding on, `.json` is appended unless `id` already ends
    /// with it, so `foo` and `foo.json` name the same entry.
    pub fn resolve(&self, id: &str) -> PathBuf {
        if self.options.encode_json && !id.ends_with(JSON_SUFFIX) {
            self.base.join(format!("{id}{JSON_SUFFIX}"))
        } else {
            self.base.join(id)
        }
    }

    /// Returns the base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the store options.
    pub fn options(&self) -> StoreOptions {
        self.options
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("base", &self.base)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_base() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("cache").join("nested");

        let store = FileStore::new(&base).unwrap();
        assert!(base.is_dir());
        assert_eq!(store.base(), base.as_path());
        assert!(store.options().encode_json);

        // Opening again is fine
        FileStore::new(&base).unwrap();
    }

    #[test]
    fn test_relative_base_rejected() {
        let result = FileStore::new("cache-test");
        assert!(matches!(result, Err(FileCacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_resolve_appends_suffix_once() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.resolve("foo"), dir.path().join("foo.json"));
        assert_eq!(store.resolve("foo.json"), dir.path().join("foo.json"));
        assert_eq!(store.resolve("foo.txt"), dir.path().join("foo.txt.json"));
    }

    #[test]
    fn test_resolve_raw_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_options(dir.path(), StoreOptions::raw()).unwrap();

        assert_eq!(store.resolve("foo"), dir.path().join("foo"));
        assert_eq!(store.resolve("foo.json"), dir.path().join("foo.json"));
    }

    #[test]
    fn test_sub_inherits_options() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_options(dir.path(), StoreOptions::raw()).unwrap();

        let sub = store.sub("x").unwrap();
        assert_eq!(sub.base(), dir.path().join("x").as_path());
        assert!(!sub.options().encode_json);
        assert!(dir.path().join("x").is_dir());

        let encoded = store.sub_with("y", StoreOptions::default()).unwrap();
        assert!(encoded.options().encode_json);
    }

    proptest::proptest! {
        #[test]
        fn prop_resolve_deterministic_and_suffixed(id in "[a-zA-Z0-9_-]{1,40}") {
            let dir = tempdir().unwrap();
            let store = FileStore::new(dir.path()).unwrap();

            let path = store.resolve(&id);
            proptest::prop_assert_eq!(&path, &store.resolve(&id));
            proptest::prop_assert_eq!(path.parent(), Some(dir.path()));
            let expected = format!("{id}{JSON_SUFFIX}");
            proptest::prop_assert_eq!(
                path.file_name().and_then(|n| n.to_str()),
                Some(expected.as_str())
            );
        }
    }

    #[test]
    fn test_sub_rejects_absolute_and_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(matches!(store.sub("/etc"), Err(FileCacheError::InvalidPath(_))));
        assert!(matches!(store.sub(""), Err(FileCacheError::InvalidPath(_))));
    }
}

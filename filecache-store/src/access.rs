//! Reading, writing, listing, and removing entries.

use std::io::ErrorKind;
use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use filecache_core::constants::{HIDDEN_PREFIX, JSON_SUFFIX, LIST_CONCURRENCY};
use filecache_core::error::{FileCacheError, Result};
use filecache_core::types::{Freshness, Payload, Ttl};

use crate::{EntryStream, FileStore};

impl FileStore {
    /// Checks whether an entry exists and is within `ttl`.
    pub async fn has(&self, id: &str, ttl: Option<Ttl>) -> Result<Freshness> {
        self.check_freshness(id, ttl).await
    }

    /// Reads and decodes an entry.
    ///
    /// Absent and expired entries both return `None`; an expired file is
    /// deleted in the background. A fresh entry that fails to decode is an
    /// error, not a miss.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, id: &str, ttl: Option<Ttl>) -> Result<Option<T>> {
        let Some(data) = self.read_fresh(id, ttl).await? else {
            return Ok(None);
        };
        if data.is_empty() {
            return Ok(None);
        }

        if self.options().encode_json {
            serde_json::from_slice(&data)
                .map(Some)
                .map_err(|source| FileCacheError::CorruptEntry {
                    id: id.to_string(),
                    source,
                })
        } else {
            decode_plain(id, data).map(Some)
        }
    }

    /// Reads an entry as an untyped JSON value.
    pub async fn get_json(&self, id: &str, ttl: Option<Ttl>) -> Result<Option<Value>> {
        self.get(id, ttl).await
    }

    /// Reads an entry's bytes without decoding.
    #[instrument(skip(self))]
    pub async fn get_raw(&self, id: &str, ttl: Option<Ttl>) -> Result<Option<Vec<u8>>> {
        Ok(self.read_fresh(id, ttl).await?.filter(|data| !data.is_empty()))
    }

    /// Opens a lazy stream over a fresh entry.
    ///
    /// Same miss and expiry behavior as [`FileStore::get`].
    #[instrument(skip(self))]
    pub async fn get_stream(&self, id: &str, ttl: Option<Ttl>) -> Result<Option<EntryStream>> {
        if !self.ensure_fresh(id, ttl).await? {
            return Ok(None);
        }

        let path = self.resolve(id);
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();
        Ok(Some(EntryStream::new(file, path, len)))
    }

    /// Stores a value, overwriting any existing entry.
    ///
    /// With JSON encoding the value is written as indented JSON. Without it,
    /// the value must serialize to a string or a sequence of bytes.
    #[instrument(skip(self, value))]
    pub async fn put<T: Serialize + ?Sized>(&self, id: &str, value: &T) -> Result<()> {
        let payload = if self.options().encode_json {
            let text = serde_json::to_vec_pretty(value).map_err(|e| {
                FileCacheError::InvalidPayload(format!("cannot encode value for '{id}': {e}"))
            })?;
            Payload::Bytes(text)
        } else {
            encode_plain(id, value)?
        };
        self.write(id, payload).await
    }

    /// Stores bytes or text verbatim, skipping encoding.
    #[instrument(skip(self, payload))]
    pub async fn put_raw(&self, id: &str, payload: impl Into<Payload>) -> Result<()> {
        self.write(id, payload.into()).await
    }

    /// Deletes an entry. Fails with `NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.resolve(id)).await {
            Ok(()) => {
                debug!("Removed entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FileCacheError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists entry ids in ascending order.
    ///
    /// Hidden files, subdirectories, and (with JSON encoding) files without
    /// the `.json` suffix are skipped.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut dir = fs::read_dir(self.base()).await?;
        let mut candidates = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(HIDDEN_PREFIX) {
                continue;
            }
            let id = if self.options().encode_json {
                match name.strip_suffix(JSON_SUFFIX) {
                    Some(stem) => stem.to_string(),
                    None => continue,
                }
            } else {
                name
            };
            candidates.push((id, entry.path()));
        }

        let checked: Vec<Result<Option<String>>> = stream::iter(candidates)
            .map(|(id, path)| async move {
                match fs::metadata(&path).await {
                    Ok(meta) if meta.is_file() => Ok(Some(id)),
                    Ok(_) => Ok(None),
                    // Removed between readdir and stat
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(FileCacheError::from(e)),
                }
            })
            .buffer_unordered(LIST_CONCURRENCY)
            .collect()
            .await;

        let mut ids = Vec::with_capacity(checked.len());
        for result in checked {
            if let Some(id) = result? {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Removes every listed entry, stopping at the first failure.
    ///
    /// Entries that disappear mid-clear are ignored. Sub-store directories
    /// are left alone.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        let ids = self.list().await?;
        let count = ids.len();
        for id in ids {
            match self.remove(&id).await {
                Ok(()) => {}
                Err(FileCacheError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        debug!(count, "Cleared store");
        Ok(())
    }

    async fn write(&self, id: &str, payload: Payload) -> Result<()> {
        let path = self.resolve(id);
        let mut file = fs::File::create(&path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;
        debug!(path = ?path, bytes = payload.len(), "Wrote entry");
        Ok(())
    }

    /// Returns true if the entry is fresh; schedules deletion if expired.
    async fn ensure_fresh(&self, id: &str, ttl: Option<Ttl>) -> Result<bool> {
        match self.check_freshness(id, ttl).await? {
            Freshness::Fresh => Ok(true),
            Freshness::Absent => Ok(false),
            Freshness::Expired => {
                self.expire(self.resolve(id));
                Ok(false)
            }
        }
    }

    async fn read_fresh(&self, id: &str, ttl: Option<Ttl>) -> Result<Option<Vec<u8>>> {
        if !self.ensure_fresh(id, ttl).await? {
            return Ok(None);
        }
        match fs::read(self.resolve(id)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort, fire-and-forget delete of an expired file.
    fn expire(&self, path: PathBuf) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(path = ?path, "No runtime to remove expired entry");
            return;
        };
        handle.spawn(async move {
            match fs::remove_file(&path).await {
                Ok(()) => debug!(path = ?path, "Removed expired entry"),
                Err(e) => warn!(path = ?path, error = %e, "Failed to remove expired entry"),
            }
        });
    }
}

/// Converts a value to text or bytes for a store without JSON encoding.
fn encode_plain<T: Serialize + ?Sized>(id: &str, value: &T) -> Result<Payload> {
    let invalid = |what: &str| {
        FileCacheError::InvalidPayload(format!(
            "'{id}' needs text or bytes without JSON encoding, got {what}"
        ))
    };

    match serde_json::to_value(value).map_err(|e| invalid(&e.to_string()))? {
        Value::String(text) => Ok(Payload::Text(text)),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Payload::Bytes)
            .ok_or_else(|| invalid("a non-byte array")),
        other => Err(invalid(json_kind(&other))),
    }
}

/// Offers raw entry bytes to `T` as text first, then as a byte sequence.
fn decode_plain<T: DeserializeOwned>(id: &str, data: Vec<u8>) -> Result<T> {
    if let Ok(text) = std::str::from_utf8(&data) {
        if let Ok(value) = serde_json::from_value(Value::String(text.to_string())) {
            return Ok(value);
        }
    }
    let bytes = Value::Array(data.into_iter().map(Value::from).collect());
    serde_json::from_value(bytes).map_err(|e| {
        FileCacheError::InvalidPayload(format!(
            "'{id}' holds raw data not representable as requested: {e}"
        ))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

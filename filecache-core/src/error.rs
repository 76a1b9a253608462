//! Error types for filecache.
//!
//! Only "entry absent" is ever folded into a cache miss. Every other failure
//! surfaces through [`FileCacheError`].

use thiserror::Error;

/// Result type alias using `FileCacheError`.
pub type Result<T> = std::result::Result<T, FileCacheError>;

/// Main error type for all store operations.
#[derive(Debug, Error)]
pub enum FileCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Store constructed with an unusable base directory.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sub-store requested with a path that is not relative.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// TTL string outside the `<integer><unit>` grammar.
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The rejected text
        input: String,
        /// Why it was rejected
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // ENTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Value cannot be stored as text or bytes.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Stored bytes failed to decode where encoded content was expected.
    #[error("Corrupt entry '{id}': {source}")]
    CorruptEntry {
        /// Entry id
        id: String,
        /// Decoder failure
        #[source]
        source: serde_json::Error,
    },

    /// Removal of an entry that does not exist.
    #[error("Entry not found: {0}")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION / STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error outside of stored entries.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FileCacheError {
    /// Returns true if the error stems from how the store or call was configured.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FileCacheError::InvalidConfig(_)
                | FileCacheError::InvalidPath(_)
                | FileCacheError::InvalidDuration { .. }
        )
    }

    /// Returns true if the error means the entry was simply not there.
    pub fn is_not_found(&self) -> bool {
        match self {
            FileCacheError::NotFound(_) => true,
            FileCacheError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns true if the stored data itself is bad.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            FileCacheError::CorruptEntry { .. } | FileCacheError::InvalidPayload(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FileCacheError::InvalidDuration {
            input: "1y".into(),
            reason: "unknown unit".into(),
        };
        assert!(err.to_string().contains("1y"));
        assert!(err.to_string().contains("unknown unit"));
    }

    #[test]
    fn test_error_classification() {
        assert!(FileCacheError::InvalidConfig("relative".into()).is_config_error());
        assert!(FileCacheError::InvalidPath("/abs".into()).is_config_error());
        assert!(!FileCacheError::NotFound("foo".into()).is_config_error());

        assert!(FileCacheError::NotFound("foo".into()).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(FileCacheError::from(io).is_not_found());
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(!FileCacheError::from(denied).is_not_found());

        assert!(FileCacheError::InvalidPayload("map".into()).is_data_error());
    }

    #[test]
    fn test_corrupt_entry_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = FileCacheError::CorruptEntry { id: "foo".into(), source };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_data_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(FileCacheError::from);
        assert!(matches!(result, Err(FileCacheError::JsonError(_))));
    }
}

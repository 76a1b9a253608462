//! On-disk conventions for filecache.

// ═══════════════════════════════════════════════════════════════════════════════
// FILE NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Suffix appended to the file name of every JSON-encoded entry.
pub const JSON_SUFFIX: &str = ".json";

/// Names starting with this prefix are never listed as entries.
pub const HIDDEN_PREFIX: char = '.';

// ═══════════════════════════════════════════════════════════════════════════════
// I/O LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum concurrent metadata lookups issued while listing a directory.
pub const LIST_CONCURRENCY: usize = 12;

/// Chunk size used by entry streams.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// MEMOIZATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Domain separator for memoization key fingerprints.
pub const DOMAIN_MEMO_KEY: &[u8] = b"FILECACHE_MEMO_KEY_V1";

/// Fingerprint length in bytes (hex output is twice as long).
pub const FINGERPRINT_SIZE: usize = 16;

/// Separator between the memo namespace and the argument fingerprint.
pub const MEMO_KEY_SEPARATOR: char = '-';

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Directory name used under the system temp dir when none is configured.
pub const DEFAULT_DIR_NAME: &str = "fs-cache";

/// Environment variable naming the base directory.
pub const ENV_DIR: &str = "FILECACHE_DIR";

/// Environment variable toggling JSON encoding (`false`/`0` disables).
pub const ENV_JSON: &str = "FILECACHE_JSON";

/// Environment variable holding the default TTL (e.g. `1h`).
pub const ENV_DEFAULT_TTL: &str = "FILECACHE_DEFAULT_TTL";

//! Freshness outcomes and TTL values.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::Result;

/// Outcome of checking an entry against an expiry window.
///
/// `Expired` and `Absent` both read as a miss, but only `Expired` means
/// there is a stale file worth cleaning up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Entry exists and is within its TTL (or no TTL was given).
    Fresh,
    /// No entry under this id.
    Absent,
    /// Entry exists but is older than the TTL.
    Expired,
}

impl Freshness {
    /// Classifies an entry modified at `modified`, observed at `now`.
    ///
    /// A modification time in the future counts as age zero.
    pub fn classify(modified: SystemTime, now: SystemTime, ttl: Option<Duration>) -> Self {
        let Some(ttl) = ttl else {
            return Freshness::Fresh;
        };
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age > ttl {
            Freshness::Expired
        } else {
            Freshness::Fresh
        }
    }

    /// Returns true for [`Freshness::Fresh`].
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }

    /// Returns true if a file exists, fresh or not.
    pub fn exists(&self) -> bool {
        !matches!(self, Freshness::Absent)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Freshness::Fresh => "fresh",
            Freshness::Absent => "absent",
            Freshness::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Maximum tolerated age of an entry.
///
/// String TTLs are parsed lazily, so a malformed one fails the call that
/// uses it rather than the construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ttl {
    /// Exact duration.
    Duration(Duration),
    /// Human-readable duration such as `1h` or `500ms`.
    Text(String),
}

impl Ttl {
    /// Resolves this TTL to a duration.
    pub fn resolve(&self) -> Result<Duration> {
        match self {
            Ttl::Duration(d) => Ok(*d),
            Ttl::Text(s) => parse_duration(s),
        }
    }

    /// Resolves eagerly, returning a `Ttl::Duration`.
    pub fn parsed(self) -> Result<Self> {
        self.resolve().map(Ttl::Duration)
    }
}

impl From<Duration> for Ttl {
    fn from(d: Duration) -> Self {
        Ttl::Duration(d)
    }
}

impl From<&str> for Ttl {
    fn from(s: &str) -> Self {
        Ttl::Text(s.to_string())
    }
}

impl From<String> for Ttl {
    fn from(s: String) -> Self {
        Ttl::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileCacheError;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_classify_without_ttl_is_fresh() {
        assert_eq!(Freshness::classify(at(0), at(1_000_000), None), Freshness::Fresh);
    }

    #[test]
    fn test_classify_boundary() {
        let ttl = Some(Duration::from_secs(60));
        assert_eq!(Freshness::classify(at(100), at(160), ttl), Freshness::Fresh);
        assert_eq!(Freshness::classify(at(100), at(161), ttl), Freshness::Expired);
    }

    #[test]
    fn test_classify_future_mtime() {
        let ttl = Some(Duration::from_secs(1));
        assert_eq!(Freshness::classify(at(500), at(100), ttl), Freshness::Fresh);
    }

    #[test]
    fn test_freshness_helpers() {
        assert!(Freshness::Fresh.is_fresh());
        assert!(Freshness::Expired.exists());
        assert!(!Freshness::Absent.exists());
        assert_eq!(Freshness::Expired.to_string(), "expired");
    }

    #[test]
    fn test_ttl_resolve() {
        assert_eq!(Ttl::from("1h").resolve().unwrap(), Duration::from_secs(3600));
        assert_eq!(
            Ttl::from(Duration::from_millis(5)).resolve().unwrap(),
            Duration::from_millis(5)
        );
        assert!(matches!(
            Ttl::from("soon").resolve(),
            Err(FileCacheError::InvalidDuration { .. })
        ));
        assert_eq!(
            Ttl::from("2s").parsed().unwrap(),
            Ttl::Duration(Duration::from_secs(2))
        );
    }
}

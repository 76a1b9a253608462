//! Human-readable TTL parsing.
//!
//! Accepted grammar is a single `<integer><unit>` term with unit one of
//! `d`, `h`, `m`, `s`, `ms` (`1h`, `30m`, `500ms`). Unit conversion is
//! delegated to `humantime`, which accepts a wider grammar; the shape check
//! here keeps inputs like `1h 30m` or `2 hours` out.

use std::time::Duration;

use crate::error::{FileCacheError, Result};

/// Units recognized after the integer part.
const UNITS: [&str; 5] = ["d", "h", "m", "s", "ms"];

/// Parses a duration string such as `1h`, `30m` or `500ms`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = |reason: &str| FileCacheError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| invalid("missing unit"))?;
    let (digits, unit) = input.split_at(split);

    if digits.is_empty() {
        return Err(invalid("missing integer"));
    }
    if !UNITS.contains(&unit) {
        return Err(invalid("unit must be one of d, h, m, s, ms"));
    }

    humantime::parse_duration(input).map_err(|e| invalid(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1d", 86_400_000 ; "days")]
    #[test_case("1h", 3_600_000 ; "hours")]
    #[test_case("30m", 1_800_000 ; "minutes")]
    #[test_case("45s", 45_000 ; "seconds")]
    #[test_case("500ms", 500 ; "millis")]
    #[test_case("0s", 0 ; "zero")]
    fn test_parse_valid(input: &str, expected_ms: u128) {
        assert_eq!(parse_duration(input).unwrap().as_millis(), expected_ms);
    }

    #[test_case("" ; "empty")]
    #[test_case("10" ; "no unit")]
    #[test_case("h" ; "no integer")]
    #[test_case("1y" ; "unknown unit")]
    #[test_case("1h30m" ; "compound")]
    #[test_case("1 h" ; "inner space")]
    #[test_case("-1h" ; "negative")]
    #[test_case("1.5h" ; "fractional")]
    #[test_case("2hours" ; "long unit")]
    fn test_parse_invalid(input: &str) {
        let err = parse_duration(input).unwrap_err();
        assert!(matches!(err, FileCacheError::InvalidDuration { .. }));
    }
}

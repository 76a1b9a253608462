//! Content fingerprints with domain separation.
//!
//! Memoization keys embed a digest of the serialized call arguments. The
//! digest is SHAKE256 over a length-prefixed domain separator and the input:
//!
//! ```text
//! output = SHAKE256(len(domain) || domain || input, FINGERPRINT_SIZE)
//! ```

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use crate::constants::{DOMAIN_MEMO_KEY, FINGERPRINT_SIZE};

/// Computes SHAKE256 hash with domain separation.
pub fn shake256(domain: &[u8], input: &[u8], output_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();

    hasher.update(&(domain.len() as u32).to_le_bytes());
    hasher.update(domain);
    hasher.update(input);

    let mut reader = hasher.finalize_xof();
    let mut output = vec![0u8; output_len];
    reader.read(&mut output);

    output
}

/// Returns the hex fingerprint of `input`, safe to embed in a file name.
///
/// # Example
///
/// ```rust
/// use filecache_core::fingerprint;
///
/// let a = fingerprint(br#"[1,"x"]"#);
/// assert_eq!(a, fingerprint(br#"[1,"x"]"#));
/// assert_eq!(a.len(), 32);
/// ```
pub fn fingerprint(input: &[u8]) -> String {
    hex::encode(shake256(DOMAIN_MEMO_KEY, input, FINGERPRINT_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shake256_variable_output() {
        let short = shake256(b"domain", b"input", 16);
        let long = shake256(b"domain", b"input", 64);

        assert_eq!(short.len(), 16);
        assert_eq!(long.len(), 64);
        assert_eq!(&short[..], &long[..16]);
    }

    #[test]
    fn test_domain_separation() {
        let a = shake256(b"domain_a", b"input", 32);
        let b = shake256(b"domain_b", b"input", 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint(b"[]");
        assert_eq!(fp.len(), FINGERPRINT_SIZE * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_distinguishes_inputs() {
        assert_ne!(fingerprint(b"[1]"), fingerprint(b"[2]"));
    }

    proptest! {
        #[test]
        fn prop_fingerprint_deterministic(input in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(fingerprint(&input), fingerprint(&input));
        }
    }
}

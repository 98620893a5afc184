//! Content fingerprinting for cache keys

use sha2::{Digest, Sha256};

/// Compute the deterministic fingerprint of a query text.
///
/// Lowercase-hex SHA-256 of the UTF-8 bytes. The digest is case- and
/// whitespace-sensitive: no normalization happens here, callers that want
/// trimmed lookups must trim before hashing.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint("What treats Type 2 Diabetes?");
        let b = fingerprint("What treats Type 2 Diabetes?");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_texts() {
        assert_ne!(fingerprint("query one"), fingerprint("query two"));
    }

    #[test]
    fn test_fingerprint_is_case_sensitive() {
        assert_ne!(fingerprint("Hello"), fingerprint("hello"));
    }

    #[test]
    fn test_fingerprint_is_whitespace_sensitive() {
        assert_ne!(fingerprint("hello"), fingerprint(" hello "));
    }

    #[test]
    fn test_fingerprint_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

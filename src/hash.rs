//! Digest helpers. JARs embedded in RPM payloads are identified by SHA-1,
//! following the hashing convention used elsewhere for content digests.

use sha1::{Digest, Sha1};

/// Computes the SHA-1 digest of `content`, returned as 40 lowercase hex chars.
pub fn sha1_hex(content: &[u8]) -> String {
    hex::encode(Sha1::digest(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_of_empty_input() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn sha1_is_forty_hex_chars() {
        let digest = sha1_hex(b"hello world");
        assert_eq!(digest.len(), 40);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

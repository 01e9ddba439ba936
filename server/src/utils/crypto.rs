//! Hashing helpers

use sha2::{Digest, Sha256};

/// SHA-256 of a string as lowercase hex
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_changes_with_input() {
        assert_ne!(sha256_hex("CREATE TABLE a"), sha256_hex("CREATE TABLE b"));
        assert_eq!(sha256_hex("").len(), 64);
    }
}

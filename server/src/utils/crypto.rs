//! Cryptographic utility functions

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random key
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Generate a random hex token (`byte_len` bytes of entropy)
pub fn generate_token(byte_len: usize) -> String {
    hex::encode(generate_key(byte_len))
}

/// SHA256 of a string as lowercase hex
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_length() {
        assert_eq!(generate_key(16).len(), 16);
        assert_eq!(generate_key(32).len(), 32);
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(12);
        assert_eq!(token.len(), 24);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token(12));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}

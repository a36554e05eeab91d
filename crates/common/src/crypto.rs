//! Cryptographic utilities shared across admin-core crates
//!
//! Access-key secret material is stored only as a salted SHA-256 hash.
//! Verification uses constant-time comparison to prevent timing attacks.

use sha2::{Digest, Sha256};

/// Hash a secret with the given salt.
///
/// The stored format is `hex(salt):hex(sha256(secret || salt))`.
pub fn hash_secret(secret: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt);
    let hash = hasher.finalize();
    format!("{}:{}", hex::encode(salt), hex::encode(hash))
}

/// Verify a candidate secret against a stored hash using constant-time
/// comparison.
pub fn verify_secret_hash(candidate: &str, stored_hash: &str) -> bool {
    let parts: Vec<&str> = stored_hash.split(':').collect();
    if parts.len() != 2 {
        return false;
    }

    let salt = match hex::decode(parts[0]) {
        Ok(salt) => salt,
        Err(_) => return false,
    };

    let hash = match hex::decode(parts[1]) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    let mut hasher = Sha256::new();
    hasher.update(candidate.as_bytes());
    hasher.update(&salt);
    let candidate_hash = hasher.finalize();

    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_secret("s3cret-material", b"some_salt_bytes!");
        assert!(verify_secret_hash("s3cret-material", &stored));
        assert!(!verify_secret_hash("wrong-secret", &stored));
    }

    #[test]
    fn test_distinct_salts_produce_distinct_hashes() {
        let a = hash_secret("same-secret", b"salt-a");
        let b = hash_secret("same-secret", b"salt-b");
        assert_ne!(a, b);
        assert!(verify_secret_hash("same-secret", &a));
        assert!(verify_secret_hash("same-secret", &b));
    }

    #[test]
    fn test_verify_malformed_stored_hash() {
        assert!(!verify_secret_hash("key", "nocolonshere"));
        assert!(!verify_secret_hash("key", "zzzz:abcd"));
        assert!(!verify_secret_hash("key", "abcd:zzzz"));
        assert!(!verify_secret_hash("key", ""));
    }

    #[test]
    fn test_verify_empty_candidate() {
        let stored = hash_secret("", b"salt");
        assert!(verify_secret_hash("", &stored));
        assert!(!verify_secret_hash("notempty", &stored));
    }
}

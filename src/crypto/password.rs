//! Credential store
//!
//! Passwords are stored as lowercase hex SHA-256 digests. The same input
//! always yields the same 64-character digest.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash a password for storing
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password against a stored digest
///
/// Never fails: a malformed digest simply doesn't match.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let computed = hash_password(password);
    if computed.len() != digest.len() {
        return false;
    }
    // Compare every byte so timing doesn't depend on the first mismatch
    computed
        .bytes()
        .zip(digest.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

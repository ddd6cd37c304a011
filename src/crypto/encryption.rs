//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for the ledger file at rest. Each
//! encryption operation generates a fresh nonce.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{StokwellError, StokwellResult};

use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Current envelope format version
const ENVELOPE_VERSION: u8 = 1;

/// Encrypted payload with the nonce needed to open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    /// Nonce (base64)
    pub nonce: String,
    /// Ciphertext with authentication tag (base64)
    pub ciphertext: String,
    #[serde(default = "default_version")]
    pub version: u8,
}

fn default_version() -> u8 {
    ENVELOPE_VERSION
}

impl EncryptedData {
    fn new(nonce: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
            version: ENVELOPE_VERSION,
        }
    }
}

fn cipher_for(key: &DerivedKey) -> StokwellResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| StokwellError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext data using AES-256-GCM
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> StokwellResult<EncryptedData> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| StokwellError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedData::new(&nonce_bytes, &ciphertext))
}

/// Decrypt ciphertext using AES-256-GCM
pub fn decrypt(encrypted: &EncryptedData, key: &DerivedKey) -> StokwellResult<Vec<u8>> {
    if encrypted.version != ENVELOPE_VERSION {
        return Err(StokwellError::Encryption(format!(
            "Unsupported encryption version: {}",
            encrypted.version
        )));
    }

    let nonce_bytes = STANDARD
        .decode(&encrypted.nonce)
        .map_err(|e| StokwellError::Encryption(format!("Invalid nonce encoding: {}", e)))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(StokwellError::Encryption(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }

    let ciphertext = STANDARD
        .decode(&encrypted.ciphertext)
        .map_err(|e| StokwellError::Encryption(format!("Invalid ciphertext encoding: {}", e)))?;

    cipher_for(key)?
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| {
            StokwellError::Encryption("Decryption failed: invalid key or corrupted data".into())
        })
}

/// Encrypt a string
pub fn encrypt_string(plaintext: &str, key: &DerivedKey) -> StokwellResult<EncryptedData> {
    encrypt(plaintext.as_bytes(), key)
}

/// Decrypt to a string
pub fn decrypt_string(encrypted: &EncryptedData, key: &DerivedKey) -> StokwellResult<String> {
    let plaintext = decrypt(encrypted, key)?;
    String::from_utf8(plaintext)
        .map_err(|e| StokwellError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::{derive_key, KeyDerivationParams};

    fn test_key(passphrase: &str) -> DerivedKey {
        derive_key(passphrase, &KeyDerivationParams::fast()).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_string() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt_string("{\"users\":{}}", &key).unwrap();
        assert_eq!(decrypt_string(&encrypted, &key).unwrap(), "{\"users\":{}}");
    }

    #[test]
    fn test_different_nonces() {
        let key = test_key("test_passphrase");
        let encrypted1 = encrypt(b"same", &key).unwrap();
        let encrypted2 = encrypt(b"same", &key).unwrap();
        assert_ne!(encrypted1.nonce, encrypted2.nonce);
        assert_ne!(encrypted1.ciphertext, encrypted2.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = encrypt(b"secret", &test_key("one")).unwrap();
        assert!(decrypt(&encrypted, &test_key("two")).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key("test_passphrase");
        let mut encrypted = encrypt(b"Hello, World!", &key).unwrap();

        let mut ciphertext = STANDARD.decode(&encrypted.ciphertext).unwrap();
        ciphertext[0] ^= 0xFF;
        encrypted.ciphertext = STANDARD.encode(&ciphertext);

        assert!(decrypt(&encrypted, &key).is_err());
    }

    #[test]
    fn test_unsupported_version() {
        let key = test_key("test_passphrase");
        let mut encrypted = encrypt(b"data", &key).unwrap();
        encrypted.version = 9;
        assert!(matches!(
            decrypt(&encrypted, &key),
            Err(StokwellError::Encryption(msg)) if msg.contains("version")
        ));
    }
}

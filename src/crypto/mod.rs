//! Cryptographic functions for StokWELL
//!
//! - `password`: SHA-256 credential digests for user accounts
//! - `key_derivation` + `encryption`: optional Argon2id / AES-256-GCM
//!   protection of the ledger file
//! - `passphrase`: enabling, unlocking and disabling that protection

pub mod encryption;
pub mod key_derivation;
pub mod passphrase;
pub mod password;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use password::{hash_password, verify_password};

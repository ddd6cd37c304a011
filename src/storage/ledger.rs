//! Ledger store
//!
//! Loads and saves the entire [`LedgerState`] as one JSON document. Every
//! save rewrites the whole file atomically. When a key is attached the
//! document is sealed in an AES-256-GCM envelope instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{decrypt, encrypt, DerivedKey, EncryptedData};
use crate::error::{StokwellError, StokwellResult};
use crate::models::LedgerState;

use super::file_io::{read_json, write_json_atomic};

/// On-disk shape of the ledger file
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum LedgerFile {
    Encrypted(EncryptedData),
    Plain(LedgerState),
}

impl Default for LedgerFile {
    fn default() -> Self {
        Self::Plain(LedgerState::default())
    }
}

/// Durable store for the ledger state
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    key: Option<DerivedKey>,
}

impl LedgerStore {
    /// Create a store for a plain JSON ledger file
    pub fn new(path: PathBuf) -> Self {
        Self { path, key: None }
    }

    /// Seal the file with this key on every save and require it on load;
    /// `None` stores plain JSON
    pub fn set_key(&mut self, key: Option<DerivedKey>) {
        self.key = key;
    }

    pub fn is_encrypted(&self) -> bool {
        self.key.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the ledger; a missing file is an empty ledger
    ///
    /// Unreadable, undecryptable or inconsistent files are reported as
    /// `StokwellError::Persistence`.
    pub fn load(&self) -> StokwellResult<LedgerState> {
        let file: LedgerFile = read_json(&self.path)?;
        let state = self.unseal(file)?;

        debug!(
            path = %self.path.display(),
            users = state.users.len(),
            stokvels = state.stokvels.len(),
            "loaded ledger"
        );
        Ok(state)
    }

    /// Interpret raw ledger file contents, e.g. the payload of a backup
    ///
    /// Applies the same decryption and consistency checks as [`load`](Self::load).
    pub fn decode(&self, raw: serde_json::Value) -> StokwellResult<LedgerState> {
        let file: LedgerFile = serde_json::from_value(raw).map_err(|e| {
            StokwellError::Persistence(format!("Not a ledger document: {}", e))
        })?;
        self.unseal(file)
    }

    fn unseal(&self, file: LedgerFile) -> StokwellResult<LedgerState> {
        let state = match file {
            LedgerFile::Plain(state) => state,
            LedgerFile::Encrypted(sealed) => {
                let key = self.key.as_ref().ok_or_else(|| {
                    StokwellError::Persistence(format!(
                        "{} is encrypted; a passphrase is required",
                        self.path.display()
                    ))
                })?;
                let plaintext = decrypt(&sealed, key)
                    .map_err(|e| StokwellError::Persistence(e.to_string()))?;
                serde_json::from_slice(&plaintext).map_err(|e| {
                    StokwellError::Persistence(format!(
                        "Failed to parse decrypted {}: {}",
                        self.path.display(),
                        e
                    ))
                })?
            }
        };

        state.check_consistency().map_err(|e| {
            StokwellError::Persistence(format!(
                "Inconsistent ledger in {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(state)
    }

    /// Overwrite the ledger file with the whole state
    pub fn save(&self, state: &LedgerState) -> StokwellResult<()> {
        match &self.key {
            None => write_json_atomic(&self.path, state)?,
            Some(key) => {
                let plaintext = serde_json::to_vec(state).map_err(|e| {
                    StokwellError::Persistence(format!("Failed to serialize ledger: {}", e))
                })?;
                let sealed = encrypt(&plaintext, key)
                    .map_err(|e| StokwellError::Persistence(e.to_string()))?;
                write_json_atomic(&self.path, &LedgerFile::Encrypted(sealed))?;
            }
        }

        debug!(path = %self.path.display(), encrypted = self.is_encrypted(), "saved ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, KeyDerivationParams};
    use crate::models::{Money, Stokvel, User};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, LedgerStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path().join("data").join("ledger.json"));
        (temp_dir, store)
    }

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new();
        let mut alice = User::new("alice", "digest");
        alice.stokvels.push("SavingsCircle".into());
        state.users.insert("alice".into(), alice);
        state.users.insert("bob".into(), User::new("bob", "digest2"));

        let mut stokvel = Stokvel::new("SavingsCircle", "alice");
        stokvel.record_contribution("alice", Money::from_cents(10000), Utc::now());
        stokvel.record_contribution("alice", Money::from_cents(2500), Utc::now());
        state.stokvels.insert("SavingsCircle".into(), stokvel);
        state
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let (_temp_dir, store) = create_test_store();
        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), LedgerState::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (_temp_dir, store) = create_test_store();
        let state = sample_state();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, state);
        let stokvel = loaded.stokvel("SavingsCircle").unwrap();
        assert_eq!(stokvel.contributions[0].amount.cents(), 10000);
        assert_eq!(stokvel.contributions[1].amount.cents(), 2500);
    }

    #[test]
    fn test_plain_file_layout() {
        let (_temp_dir, store) = create_test_store();
        store.save(&sample_state()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(raw["users"]["alice"].is_object());
        assert_eq!(raw["stokvels"]["SavingsCircle"]["balance"], 12500);
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let (_temp_dir, store) = create_test_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ broken").unwrap();

        assert!(matches!(store.load(), Err(StokwellError::Persistence(_))));
    }

    #[test]
    fn test_inconsistent_file_is_fatal() {
        let (_temp_dir, store) = create_test_store();
        let mut state = sample_state();
        state.stokvels.get_mut("SavingsCircle").unwrap().balance = Money::zero();
        store.save(&state).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Inconsistent ledger"));
    }

    #[test]
    fn test_encrypted_round_trip() {
        let (_temp_dir, store) = create_test_store();
        let params = KeyDerivationParams::fast();
        let mut store = store;
        store.set_key(Some(derive_key("passphrase", &params).unwrap()));

        let state = sample_state();
        store.save(&state).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("ciphertext"));
        assert!(!raw.contains("SavingsCircle"));

        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_encrypted_file_needs_key() {
        let (temp_dir, store) = create_test_store();
        let params = KeyDerivationParams::fast();
        let mut store = store;
        store.set_key(Some(derive_key("passphrase", &params).unwrap()));
        store.save(&sample_state()).unwrap();

        let plain = LedgerStore::new(temp_dir.path().join("data").join("ledger.json"));
        assert!(matches!(plain.load(), Err(StokwellError::Persistence(_))));

        let mut wrong = LedgerStore::new(temp_dir.path().join("data").join("ledger.json"));
        wrong.set_key(Some(derive_key("other", &params).unwrap()));
        assert!(matches!(wrong.load(), Err(StokwellError::Persistence(_))));
    }

    #[test]
    fn test_decode_raw_documents() {
        let (_temp_dir, store) = create_test_store();
        let state = sample_state();

        let raw = serde_json::to_value(&state).unwrap();
        assert_eq!(store.decode(raw).unwrap(), state);

        assert!(matches!(
            store.decode(serde_json::Value::Null),
            Err(StokwellError::Persistence(_))
        ));
    }
}

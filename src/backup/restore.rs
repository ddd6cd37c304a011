//! Backup restoration for StokWELL
//!
//! A backup is only restored after its payload has been decoded with the
//! current key and passed the ledger consistency checks.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StokwellResult;
use crate::models::LedgerState;
use crate::storage::{write_json_atomic, LedgerStore};

use super::manager::BackupArchive;

/// Restores ledger backups into a store
pub struct RestoreManager<'a> {
    store: &'a LedgerStore,
}

impl<'a> RestoreManager<'a> {
    /// Restore into the file `store` points at, decoding with its key
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Replace the ledger file with the contents of a backup
    ///
    /// The current file is left untouched if the backup can't be read,
    /// decrypted or fails the consistency checks.
    pub fn restore_from_file(&self, backup_path: &Path) -> StokwellResult<RestoreResult> {
        let archive = BackupArchive::read(backup_path)?;
        let state = self.store.decode(archive.ledger.clone())?;

        write_json_atomic(self.store.path(), &archive.ledger)?;

        info!(
            backup = %backup_path.display(),
            users = state.users.len(),
            stokvels = state.stokvels.len(),
            "restored ledger"
        );
        Ok(RestoreResult::new(&archive, &state))
    }

    /// Check a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> StokwellResult<RestoreResult> {
        let archive = BackupArchive::read(backup_path)?;
        let state = self.store.decode(archive.ledger.clone())?;
        Ok(RestoreResult::new(&archive, &state))
    }
}

/// What a backup holds
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub encrypted: bool,
    pub users: usize,
    pub stokvels: usize,
}

impl RestoreResult {
    fn new(archive: &BackupArchive, state: &LedgerState) -> Self {
        Self {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            encrypted: archive.is_encrypted(),
            users: state.users.len(),
            stokvels: state.stokvels.len(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Backup from {} (v{}{}): {} users, {} stokvels",
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC"),
            self.schema_version,
            if self.encrypted { ", encrypted" } else { "" },
            self.users,
            self.stokvels
        )
    }
}

//! Backup system for StokWELL
//!
//! Rolling backups of the ledger file with a retention policy, and restore.
//!
//! - `BackupManager`: creates, lists and prunes backups
//! - `RestoreManager`: validates a backup and restores it
//!
//! # Backup Format
//!
//! Each backup is a JSON file named `backup-YYYYMMDD-HHMMSS-mmm.json`
//! holding `schema_version`, `created_at`, and `ledger`: the ledger file
//! exactly as it was on disk, so encrypted ledgers stay encrypted in their
//! backups.
//!
//! # Retention Policy
//!
//! By default the system keeps 30 daily backups and 12 monthly backups (the
//! first backup of each month).

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager, BACKUP_SCHEMA_VERSION};
pub use restore::{RestoreManager, RestoreResult};

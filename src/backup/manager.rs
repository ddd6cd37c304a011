//! Backup manager for StokWELL
//!
//! Handles rolling backups of the ledger file with configurable retention.
//! Backups are stored as dated JSON archives.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::paths::StokwellPaths;
use crate::config::settings::BackupRetention;
use crate::error::{StokwellError, StokwellResult};
use crate::models::LedgerState;

/// Current archive schema
pub const BACKUP_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Parsed from the filename
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Oldest backup of its calendar month; kept under the monthly quota
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Schema version for migration support
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// The ledger file exactly as it was on disk, sealed or plain
    pub ledger: serde_json::Value,
}

impl BackupArchive {
    /// Read and parse an archive file
    pub fn read(path: &Path) -> StokwellResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StokwellError::Io(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| StokwellError::Json(format!("Failed to parse backup file: {}", e)))
    }

    /// Whether the payload is an encrypted envelope rather than plain JSON
    pub fn is_encrypted(&self) -> bool {
        self.ledger.get("ciphertext").is_some()
    }
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    ledger_file: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: &StokwellPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            ledger_file: paths.ledger_file(),
            retention,
        }
    }

    /// Archive the current ledger file
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> StokwellResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            StokwellError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION,
            created_at: now,
            ledger: read_ledger_value(&self.ledger_file)?,
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| StokwellError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| StokwellError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(path = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> StokwellResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            StokwellError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                StokwellError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        // Oldest first to find the first backup of each month
        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let mut last_month = None;
        for backup in &mut backups {
            let month = (backup.created_at.year(), backup.created_at.month());
            backup.is_monthly = last_month != Some(month);
            last_month = Some(month);
        }

        backups.reverse();
        Ok(backups)
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> StokwellResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        let (monthly, daily): (Vec<_>, Vec<_>) =
            backups.into_iter().partition(|b| b.is_monthly);

        for backup in daily.into_iter().skip(self.retention.daily_count as usize) {
            fs::remove_file(&backup.path)
                .map_err(|e| StokwellError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        for backup in monthly
            .into_iter()
            .skip(self.retention.monthly_count as usize)
        {
            fs::remove_file(&backup.path).map_err(|e| {
                StokwellError::Io(format!("Failed to delete old monthly backup: {}", e))
            })?;
            deleted.push(backup.path);
        }

        debug!(deleted = deleted.len(), "enforced backup retention");
        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> StokwellResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Look up a backup by filename
    pub fn get_backup(&self, filename: &str) -> StokwellResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> StokwellResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Read the ledger file as a generic value; a missing file is an empty ledger
fn read_ledger_value(path: &Path) -> StokwellResult<serde_json::Value> {
    if !path.exists() {
        return serde_json::to_value(LedgerState::default())
            .map_err(|e| StokwellError::Json(format!("Failed to serialize ledger: {}", e)));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| StokwellError::Io(format!("Failed to read ledger for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| StokwellError::Json(format!("Failed to parse ledger for backup: {}", e)))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LedgerStore;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, StokwellPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StokwellPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };

        let manager = BackupManager::new(&paths, retention);
        (manager, paths, temp_dir)
    }

    fn write_backup(manager: &BackupManager, stamp: &str) {
        let archive = BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION,
            created_at: Utc::now(),
            ledger: serde_json::json!({}),
        };
        fs::write(
            manager.backup_dir().join(format!("backup-{}.json", stamp)),
            serde_json::to_string(&archive).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_create_backup() {
        let (manager, _paths, _temp) = create_test_manager();

        let backup_path = manager.create_backup().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().contains("backup-"));
    }

    #[test]
    fn test_backup_contains_ledger() {
        let (manager, paths, _temp) = create_test_manager();
        let store = LedgerStore::new(paths.ledger_file());
        let mut state = LedgerState::new();
        state
            .users
            .insert("alice".into(), crate::models::User::new("alice", "digest"));
        store.save(&state).unwrap();

        let archive = BackupArchive::read(&manager.create_backup().unwrap()).unwrap();
        assert_eq!(archive.schema_version, BACKUP_SCHEMA_VERSION);
        assert!(!archive.is_encrypted());
        assert_eq!(store.decode(archive.ledger).unwrap(), state);
    }

    #[test]
    fn test_backup_of_missing_ledger_is_empty() {
        let (manager, paths, _temp) = create_test_manager();
        let archive = BackupArchive::read(&manager.create_backup().unwrap()).unwrap();

        let store = LedgerStore::new(paths.ledger_file());
        assert_eq!(store.decode(archive.ledger).unwrap(), LedgerState::default());
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _paths, _temp) = create_test_manager();
        write_backup(&manager, "20260301-090000-000");
        write_backup(&manager, "20260315-090000-000");
        write_backup(&manager, "20260302-090000-000");
        fs::write(manager.backup_dir().join("notes.json"), "{}").unwrap();

        let names: Vec<_> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.filename)
            .collect();
        assert_eq!(
            names,
            vec![
                "backup-20260315-090000-000.json",
                "backup-20260302-090000-000.json",
                "backup-20260301-090000-000.json",
            ]
        );
    }

    #[test]
    fn test_first_backup_of_month_is_monthly() {
        let (manager, _paths, _temp) = create_test_manager();
        write_backup(&manager, "20260105-090000-000");
        write_backup(&manager, "20260120-090000-000");
        write_backup(&manager, "20260203-090000-000");

        let backups = manager.list_backups().unwrap();
        let monthly: Vec<_> = backups
            .iter()
            .filter(|b| b.is_monthly)
            .map(|b| b.filename.as_str())
            .collect();
        assert_eq!(
            monthly,
            vec![
                "backup-20260203-090000-000.json",
                "backup-20260105-090000-000.json",
            ]
        );
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _paths, _temp) = create_test_manager();
        // One monthly backup and five daily ones in March, plus three older months
        for day in 1..=6 {
            write_backup(&manager, &format!("202603{:02}-090000-000", day));
        }
        for month in 10..=12 {
            write_backup(&manager, &format!("2025{:02}01-090000-000", month));
        }

        let deleted = manager.enforce_retention().unwrap();
        // 5 daily - 3 kept, 4 monthly - 2 kept
        assert_eq!(deleted.len(), 4);

        let remaining: Vec<_> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.filename)
            .collect();
        assert_eq!(remaining.len(), 5);
        assert!(remaining.contains(&"backup-20260306-090000-000.json".to_string()));
        assert!(remaining.contains(&"backup-20260301-090000-000.json".to_string()));
        assert!(!remaining.contains(&"backup-20251001-090000-000.json".to_string()));
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _paths, _temp) = create_test_manager();
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        let latest = manager.get_latest_backup().unwrap().unwrap();
        assert_eq!(latest.path, path);

        let by_name = manager.get_backup(&latest.filename).unwrap().unwrap();
        assert_eq!(by_name.path, path);
        assert!(manager.get_backup("backup-missing.json").unwrap().is_none());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.day(), 27);

        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251127").is_none());
        assert!(parse_backup_timestamp("20251327-143022").is_none());
    }

    #[test]
    fn test_empty_backup_dir() {
        let (manager, _paths, _temp) = create_test_manager();
        assert!(manager.list_backups().unwrap().is_empty());
    }
}

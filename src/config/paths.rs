//! Path management for StokWELL
//!
//! Provides XDG-compliant path resolution for settings, the ledger file,
//! the audit log and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `STOKWELL_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/stokwell` or `~/.config/stokwell`
//! 3. Windows: `%APPDATA%\stokwell`

use std::path::PathBuf;

use crate::error::StokwellError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "STOKWELL_DATA_DIR";

/// Manages all paths used by StokWELL
#[derive(Debug, Clone)]
pub struct StokwellPaths {
    base_dir: PathBuf,
}

impl StokwellPaths {
    /// Create a new StokwellPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, StokwellError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create StokwellPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/stokwell/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (~/.config/stokwell/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to ledger.json (users and stokvels)
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), StokwellError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| StokwellError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| StokwellError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir()).map_err(|e| {
            StokwellError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, StokwellError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                StokwellError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("stokwell"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, StokwellError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| StokwellError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("stokwell"))
}

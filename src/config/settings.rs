//! User settings for StokWELL
//!
//! Manages display preferences, backup retention and at-rest encryption
//! settings.

use serde::{Deserialize, Serialize};

use super::paths::StokwellPaths;
use crate::crypto::key_derivation::KeyDerivationParams;
use crate::error::StokwellError;
use crate::models::RecordStyle;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// Encryption settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EncryptionSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Key derivation parameters (salt, memory cost, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_params: Option<KeyDerivationParams>,

    /// A known marker encrypted with the derived key, used to check passphrases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

/// User settings for StokWELL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format used in transaction history (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How many recent transactions the dashboard shows
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,

    #[serde(default)]
    pub encryption: EncryptionSettings,

    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Take a backup automatically before every restore
    #[serde(default = "default_true")]
    pub backup_before_restore: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_recent_transactions() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            recent_transactions: default_recent_transactions(),
            encryption: EncryptionSettings::default(),
            backup_retention: BackupRetention::default(),
            backup_before_restore: default_true(),
        }
    }
}

impl Settings {
    pub fn is_encryption_enabled(&self) -> bool {
        self.encryption.enabled
    }

    /// Rendering style for new transaction records
    pub fn record_style(&self) -> RecordStyle {
        RecordStyle {
            currency_symbol: self.currency_symbol.clone(),
            date_format: self.date_format.clone(),
        }
    }

    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &StokwellPaths) -> Result<Self, StokwellError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| StokwellError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| StokwellError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that can't be enforced by deserialization alone
    pub fn validate(&self) -> Result<(), StokwellError> {
        self.record_style().validate().map_err(StokwellError::Config)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &StokwellPaths) -> Result<(), StokwellError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| StokwellError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| StokwellError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

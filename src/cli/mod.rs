//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the ledger facade.

pub mod backup;
pub mod encrypt;
pub mod export;
pub mod stokvel;
pub mod user;

pub use backup::{handle_backup_command, BackupCommands};
pub use encrypt::{handle_encrypt_command, EncryptCommands};
pub use export::{handle_export_command, ExportCommands};
pub use stokvel::{handle_stokvel_command, StokvelCommands};
pub use user::{handle_user_command, UserCommands};

use clap::Args;
use zeroize::Zeroizing;

use crate::config::{Settings, StokwellPaths};
use crate::crypto::{passphrase, DerivedKey};
use crate::error::{StokwellError, StokwellResult};
use crate::ledger::Ledger;

/// Environment variable holding the ledger passphrase
pub const PASSPHRASE_ENV: &str = "STOKWELL_PASSPHRASE";

/// The user a command acts as
#[derive(Args, Debug)]
pub struct Credentials {
    /// Username to act as
    #[arg(short, long)]
    pub user: String,

    /// Password; prompted for when omitted
    #[arg(long, env = "STOKWELL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn password(&self) -> StokwellResult<Zeroizing<String>> {
        secret_or_prompt(self.password.clone(), "Password: ")
    }

    /// Log in, returning the welcome message
    pub fn authenticate(&self, ledger: &Ledger) -> StokwellResult<String> {
        let password = self.password()?;
        Ok(ledger.login(&self.user, &password)?.message)
    }
}

/// Use `given` if present, otherwise read a hidden line from the terminal
pub fn secret_or_prompt(given: Option<String>, prompt: &str) -> StokwellResult<Zeroizing<String>> {
    match given {
        Some(secret) => Ok(Zeroizing::new(secret)),
        None => rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| StokwellError::Io(format!("Failed to read input: {}", e))),
    }
}

/// Ledger passphrase from the environment or a prompt
pub fn read_passphrase(prompt: &str) -> StokwellResult<Zeroizing<String>> {
    secret_or_prompt(std::env::var(PASSPHRASE_ENV).ok(), prompt)
}

/// Key for the ledger file, if encryption is enabled
pub fn unlock_key(settings: &Settings) -> StokwellResult<Option<DerivedKey>> {
    if !settings.is_encryption_enabled() {
        return Ok(None);
    }
    let secret = read_passphrase("Ledger passphrase: ")?;
    passphrase::unlock(&settings.encryption, &secret).map(Some)
}

/// Open the ledger, unlocking it first when it is encrypted
pub fn open_ledger(paths: &StokwellPaths, settings: &Settings) -> StokwellResult<Ledger> {
    let key = unlock_key(settings)?;
    Ledger::open(paths, settings, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_given_secret_is_used() {
        let secret = secret_or_prompt(Some("pw1".into()), "unused").unwrap();
        assert_eq!(secret.as_str(), "pw1");
    }

    #[test]
    fn test_plain_settings_need_no_key() {
        assert!(unlock_key(&Settings::default()).unwrap().is_none());
    }
}

//! Encryption CLI commands
//!
//! Enabling, disabling and inspecting at-rest encryption of the ledger file.
//! Settings are always saved before the file is rewritten, so the
//! parameters needed to read an encrypted file are never lost.

use clap::Subcommand;
use zeroize::Zeroizing;

use super::{read_passphrase, secret_or_prompt, PASSPHRASE_ENV};
use crate::config::{Settings, StokwellPaths};
use crate::crypto::{passphrase, KeyDerivationParams};
use crate::error::{StokwellError, StokwellResult};
use crate::ledger::Ledger;

const MIN_PASSPHRASE_LEN: usize = 8;

/// Encryption management commands
#[derive(Subcommand, Debug)]
pub enum EncryptCommands {
    /// Encrypt the ledger file with a passphrase
    Enable,

    /// Store the ledger file unencrypted again (requires the passphrase)
    Disable,

    /// Show encryption status
    Status,
}

/// Handle encryption commands
pub fn handle_encrypt_command(
    paths: &StokwellPaths,
    settings: &mut Settings,
    cmd: EncryptCommands,
) -> StokwellResult<()> {
    match cmd {
        EncryptCommands::Enable => enable_encryption(paths, settings),
        EncryptCommands::Disable => disable_encryption(paths, settings),
        EncryptCommands::Status => {
            show_status(settings);
            Ok(())
        }
    }
}

fn enable_encryption(paths: &StokwellPaths, settings: &mut Settings) -> StokwellResult<()> {
    if settings.is_encryption_enabled() {
        println!("Encryption is already enabled.");
        return Ok(());
    }

    let mut ledger = Ledger::open(paths, settings, None)?;
    let secret = new_passphrase()?;

    println!("Deriving encryption key...");
    let key = passphrase::enable(&mut settings.encryption, &secret, KeyDerivationParams::new())?;
    settings.save(paths)?;
    ledger.reseal(Some(key))?;

    println!("Encryption enabled.");
    println!("Keep your passphrase safe: there is no recovery mechanism!");
    Ok(())
}

fn disable_encryption(paths: &StokwellPaths, settings: &mut Settings) -> StokwellResult<()> {
    if !settings.is_encryption_enabled() {
        println!("Encryption is not enabled.");
        return Ok(());
    }

    let secret = read_passphrase("Current passphrase: ")?;
    let key = passphrase::unlock(&settings.encryption, &secret)?;

    let mut ledger = Ledger::open(paths, settings, Some(key))?;
    ledger.reseal(None)?;

    passphrase::disable(&mut settings.encryption);
    settings.save(paths)?;

    println!("Encryption disabled. The ledger is now stored unencrypted.");
    Ok(())
}

fn show_status(settings: &Settings) {
    if settings.is_encryption_enabled() {
        println!("Encryption: ENABLED");
        if let Some(params) = &settings.encryption.key_params {
            println!("  Algorithm:   Argon2id + AES-256-GCM");
            println!("  Memory Cost: {} KiB", params.memory_cost);
            println!("  Time Cost:   {} iterations", params.time_cost);
            println!("  Parallelism: {} threads", params.parallelism);
        }
    } else {
        println!("Encryption: DISABLED");
        println!("Run 'stokwell encrypt enable' to encrypt the ledger file.");
    }
}

/// New passphrase from the environment, or prompted twice
fn new_passphrase() -> StokwellResult<Zeroizing<String>> {
    let secret = match std::env::var(PASSPHRASE_ENV).ok() {
        Some(secret) => Zeroizing::new(secret),
        None => {
            let first = secret_or_prompt(None, "New passphrase: ")?;
            let second = secret_or_prompt(None, "Confirm passphrase: ")?;
            if *first != *second {
                return Err(StokwellError::Validation("Passphrases do not match".into()));
            }
            first
        }
    };

    if secret.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(StokwellError::Validation(format!(
            "Passphrase must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }
    Ok(secret)
}

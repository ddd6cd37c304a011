//! Passphrase handling for at-rest encryption
//!
//! A known marker is encrypted with the derived key and kept in settings, so
//! a wrong passphrase is reported before the ledger file is touched.

use crate::config::settings::EncryptionSettings;
use crate::error::{StokwellError, StokwellResult};

use super::encryption::{decrypt_string, encrypt_string, EncryptedData};
use super::key_derivation::{derive_key, DerivedKey, KeyDerivationParams};

const VERIFICATION_MARKER: &str = "stokwell_verify";

/// Turn encryption on: fresh salt, derived key, verification marker
pub fn enable(
    encryption: &mut EncryptionSettings,
    passphrase: &str,
    params: KeyDerivationParams,
) -> StokwellResult<DerivedKey> {
    let key = derive_key(passphrase, &params)?;
    let verification = encrypt_string(VERIFICATION_MARKER, &key)?;
    let verification_json = serde_json::to_string(&verification).map_err(|e| {
        StokwellError::Encryption(format!("Failed to serialize verification: {}", e))
    })?;

    encryption.enabled = true;
    encryption.key_params = Some(params);
    encryption.verification = Some(verification_json);

    Ok(key)
}

/// Derive the key for an encrypted ledger and check it against the marker
pub fn unlock(encryption: &EncryptionSettings, passphrase: &str) -> StokwellResult<DerivedKey> {
    let params = encryption
        .key_params
        .as_ref()
        .ok_or_else(|| StokwellError::Encryption("Missing key derivation parameters".into()))?;
    let verification = encryption
        .verification
        .as_ref()
        .ok_or_else(|| StokwellError::Encryption("Missing passphrase verification".into()))?;

    let key = derive_key(passphrase, params)?;

    let sealed: EncryptedData = serde_json::from_str(verification)
        .map_err(|e| StokwellError::Encryption(format!("Corrupt verification data: {}", e)))?;

    match decrypt_string(&sealed, &key) {
        Ok(marker) if marker == VERIFICATION_MARKER => Ok(key),
        _ => Err(StokwellError::Encryption("Incorrect passphrase".into())),
    }
}

/// Turn encryption off in settings
pub fn disable(encryption: &mut EncryptionSettings) {
    encryption.enabled = false;
    encryption.key_params = None;
    encryption.verification = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_then_unlock() {
        let mut settings = EncryptionSettings::default();
        let key = enable(&mut settings, "hunter2", KeyDerivationParams::fast()).unwrap();

        assert!(settings.enabled);
        let unlocked = unlock(&settings, "hunter2").unwrap();
        assert_eq!(key.as_bytes(), unlocked.as_bytes());
    }

    #[test]
    fn test_wrong_passphrase() {
        let mut settings = EncryptionSettings::default();
        enable(&mut settings, "hunter2", KeyDerivationParams::fast()).unwrap();

        let err = unlock(&settings, "letmein").unwrap_err();
        assert_eq!(err.to_string(), "Encryption error: Incorrect passphrase");
    }

    #[test]
    fn test_unlock_without_params() {
        let settings = EncryptionSettings::default();
        assert!(unlock(&settings, "anything").is_err());
    }

    #[test]
    fn test_disable_clears_settings() {
        let mut settings = EncryptionSettings::default();
        enable(&mut settings, "hunter2", KeyDerivationParams::fast()).unwrap();
        disable(&mut settings);
        assert!(!settings.enabled);
        assert!(settings.key_params.is_none());
        assert!(settings.verification.is_none());
    }
}

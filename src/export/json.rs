//! JSON Export functionality
//!
//! Exports the complete ledger to JSON with schema versioning. Password
//! digests are never exported.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StokwellError, StokwellResult};
use crate::models::{LedgerState, Money, Stokvel, TransactionRecord, User};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A user as it appears in an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedUser {
    pub username: String,
    pub balance: Money,
    pub transactions: Vec<TransactionRecord>,
    pub stokvels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ExportedUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            balance: user.balance,
            transactions: user.transactions.clone(),
            stokvels: user.stokvels.clone(),
            created_at: user.created_at,
        }
    }
}

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Users ordered by username
    pub users: Vec<ExportedUser>,

    /// Stokvels ordered by name
    pub stokvels: Vec<Stokvel>,

    pub metadata: ExportMetadata,
}

/// Totals for a quick sanity check of an export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub stokvel_count: usize,
    pub contribution_count: usize,

    /// Sum of all stokvel balances
    pub total_saved: Money,

    pub earliest_contribution: Option<DateTime<Utc>>,
    pub latest_contribution: Option<DateTime<Utc>>,
}

impl FullExport {
    pub fn from_state(state: &LedgerState) -> Self {
        let users: Vec<ExportedUser> = state.users.values().map(ExportedUser::from).collect();
        let stokvels: Vec<Stokvel> = state.stokvels.values().cloned().collect();

        let dates = || stokvels.iter().flat_map(|s| s.contributions.iter().map(|c| c.date));

        let metadata = ExportMetadata {
            user_count: users.len(),
            stokvel_count: stokvels.len(),
            contribution_count: stokvels.iter().map(|s| s.contributions.len()).sum(),
            total_saved: stokvels.iter().map(|s| s.balance).sum(),
            earliest_contribution: dates().min(),
            latest_contribution: dates().max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            stokvels,
            metadata,
        }
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(
    state: &LedgerState,
    writer: &mut W,
    pretty: bool,
) -> StokwellResult<()> {
    let export = FullExport::from_state(state);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| StokwellError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_password;
    use crate::models::RecordStyle;
    use crate::services::{stokvel, user};

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new();
        let style = RecordStyle::default();
        user::register(&mut state, "alice", "pw1").unwrap();
        user::register(&mut state, "bob", "pw2").unwrap();
        stokvel::create(&mut state, "SavingsCircle", "alice").unwrap();
        stokvel::create(&mut state, "Burial", "bob").unwrap();
        stokvel::contribute(&mut state, "SavingsCircle", Money::from_cents(10000), "alice", &style)
            .unwrap();
        stokvel::contribute(&mut state, "Burial", Money::from_cents(500), "bob", &style).unwrap();
        state
    }

    #[test]
    fn test_full_export() {
        let export = FullExport::from_state(&sample_state());

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.users.len(), 2);
        assert_eq!(export.stokvels[0].name, "Burial");
        assert_eq!(export.metadata.contribution_count, 2);
        assert_eq!(export.metadata.total_saved.cents(), 10500);
        assert!(export.metadata.earliest_contribution <= export.metadata.latest_contribution);
    }

    #[test]
    fn test_empty_export() {
        let export = FullExport::from_state(&LedgerState::new());
        assert_eq!(export.metadata.user_count, 0);
        assert!(export.metadata.earliest_contribution.is_none());
    }

    #[test]
    fn test_json_omits_password_digests() {
        let mut output = Vec::new();
        export_full_json(&sample_state(), &mut output, true).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(!text.contains("password_hash"));
        assert!(!text.contains(&hash_password("pw1")));

        let parsed: FullExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.users[0].username, "alice");
        assert_eq!(parsed.stokvels[1].balance.cents(), 10000);
    }
}

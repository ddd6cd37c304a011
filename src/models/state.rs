//! Application state
//!
//! The whole ledger: every user and every stokvel, keyed by name. This is
//! the unit that gets loaded and saved.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;
use super::stokvel::Stokvel;
use super::user::User;

/// All users and stokvels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub stokvels: BTreeMap<String, Stokvel>,
}

/// A broken invariant found by [`LedgerState::check_consistency`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    UserKeyMismatch { key: String, username: String },
    StokvelKeyMismatch { key: String, name: String },
    DanglingStokvel { username: String, stokvel: String },
    MissingMember { username: String, stokvel: String },
    UnknownMember { username: String, stokvel: String },
    MissingMembership { username: String, stokvel: String },
    BalanceMismatch { stokvel: String, balance: Money, total: Money },
    NegativeBalance { username: String },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserKeyMismatch { key, username } => {
                write!(f, "user stored under '{}' is named '{}'", key, username)
            }
            Self::StokvelKeyMismatch { key, name } => {
                write!(f, "stokvel stored under '{}' is named '{}'", key, name)
            }
            Self::DanglingStokvel { username, stokvel } => {
                write!(f, "{} belongs to unknown stokvel '{}'", username, stokvel)
            }
            Self::MissingMember { username, stokvel } => {
                write!(f, "{} lists '{}' but is not one of its members", username, stokvel)
            }
            Self::UnknownMember { username, stokvel } => {
                write!(f, "stokvel '{}' has unknown member '{}'", stokvel, username)
            }
            Self::MissingMembership { username, stokvel } => {
                write!(f, "stokvel '{}' has member {} who does not list it", stokvel, username)
            }
            Self::BalanceMismatch {
                stokvel,
                balance,
                total,
            } => write!(
                f,
                "stokvel '{}' balance {} does not match contributions {}",
                stokvel, balance, total
            ),
            Self::NegativeBalance { username } => {
                write!(f, "user {} has a negative balance", username)
            }
        }
    }
}

impl std::error::Error for ConsistencyError {}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn stokvel(&self, name: &str) -> Option<&Stokvel> {
        self.stokvels.get(name)
    }

    /// Verify referential consistency and balance invariants
    ///
    /// Returns the first violation found.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        for (key, user) in &self.users {
            if key != &user.username {
                return Err(ConsistencyError::UserKeyMismatch {
                    key: key.clone(),
                    username: user.username.clone(),
                });
            }
            if user.balance.is_negative() {
                return Err(ConsistencyError::NegativeBalance {
                    username: key.clone(),
                });
            }
            for name in &user.stokvels {
                let stokvel =
                    self.stokvels
                        .get(name)
                        .ok_or_else(|| ConsistencyError::DanglingStokvel {
                            username: key.clone(),
                            stokvel: name.clone(),
                        })?;
                if !stokvel.has_member(key) {
                    return Err(ConsistencyError::MissingMember {
                        username: key.clone(),
                        stokvel: name.clone(),
                    });
                }
            }
        }

        for (key, stokvel) in &self.stokvels {
            if key != &stokvel.name {
                return Err(ConsistencyError::StokvelKeyMismatch {
                    key: key.clone(),
                    name: stokvel.name.clone(),
                });
            }
            for member in &stokvel.members {
                let user =
                    self.users
                        .get(member)
                        .ok_or_else(|| ConsistencyError::UnknownMember {
                            username: member.clone(),
                            stokvel: key.clone(),
                        })?;
                if !user.is_member_of(key) {
                    return Err(ConsistencyError::MissingMembership {
                        username: member.clone(),
                        stokvel: key.clone(),
                    });
                }
            }
            let total = stokvel.total_contributions();
            if total != stokvel.balance {
                return Err(ConsistencyError::BalanceMismatch {
                    stokvel: key.clone(),
                    balance: stokvel.balance,
                    total,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new();
        let mut alice = User::new("alice", "digest");
        alice.stokvels.push("SavingsCircle".into());
        state.users.insert("alice".into(), alice);
        state
            .stokvels
            .insert("SavingsCircle".into(), Stokvel::new("SavingsCircle", "alice"));
        state
    }

    #[test]
    fn test_empty_state_is_consistent() {
        let state = LedgerState::new();
        assert!(state.users.is_empty());
        assert!(state.stokvels.is_empty());
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_sample_state_is_consistent() {
        assert!(sample_state().check_consistency().is_ok());
    }

    #[test]
    fn test_detects_dangling_stokvel() {
        let mut state = sample_state();
        state
            .users
            .get_mut("alice")
            .unwrap()
            .stokvels
            .push("Ghost".into());
        assert!(matches!(
            state.check_consistency(),
            Err(ConsistencyError::DanglingStokvel { .. })
        ));
    }

    #[test]
    fn test_detects_unknown_member() {
        let mut state = sample_state();
        state
            .stokvels
            .get_mut("SavingsCircle")
            .unwrap()
            .members
            .push("mallory".into());
        assert!(matches!(
            state.check_consistency(),
            Err(ConsistencyError::UnknownMember { .. })
        ));
    }

    #[test]
    fn test_detects_balance_mismatch() {
        let mut state = sample_state();
        let stokvel = state.stokvels.get_mut("SavingsCircle").unwrap();
        stokvel.record_contribution("alice", Money::from_cents(500), Utc::now());
        stokvel.balance = Money::from_cents(400);

        let err = state.check_consistency().unwrap_err();
        assert!(matches!(err, ConsistencyError::BalanceMismatch { .. }));
        assert!(err.to_string().contains("R4.00"));
    }

    #[test]
    fn test_empty_json_object_loads_as_empty_state() {
        let state: LedgerState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, LedgerState::default());
    }
}

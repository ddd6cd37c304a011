//! User model
//!
//! A registered StokWELL user with a wallet balance, a transaction history
//! and the list of stokvels they belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::record::TransactionRecord;

/// Maximum length of usernames and stokvel names
pub const MAX_NAME_LEN: usize = 100;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive key
    pub username: String,

    /// Hex SHA-256 digest of the password
    pub password_hash: String,

    /// Wallet balance, never negative
    #[serde(default)]
    pub balance: Money,

    /// Append-only history, oldest first
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,

    /// Names of joined stokvels, in join order
    #[serde(default)]
    pub stokvels: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with zero balance and empty history
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            balance: Money::zero(),
            transactions: Vec::new(),
            stokvels: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_member_of(&self, stokvel: &str) -> bool {
        self.stokvels.iter().any(|s| s == stokvel)
    }

    pub fn push_transaction(&mut self, record: TransactionRecord) {
        self.transactions.push(record);
    }

    /// The last `count` transactions, oldest first
    pub fn recent_transactions(&self, count: usize) -> &[TransactionRecord] {
        let start = self.transactions.len().saturating_sub(count);
        &self.transactions[start..]
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.balance)
    }
}

/// Validation errors for usernames and stokvel names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    Empty(&'static str),
    TooLong(&'static str, usize),
    SurroundingWhitespace(&'static str),
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(kind) => write!(f, "{} cannot be empty", kind),
            Self::TooLong(kind, len) => {
                write!(f, "{} too long ({} chars, max {})", kind, len, MAX_NAME_LEN)
            }
            Self::SurroundingWhitespace(kind) => {
                write!(f, "{} cannot start or end with whitespace", kind)
            }
        }
    }
}

impl std::error::Error for NameValidationError {}

/// Validate a key such as a username or stokvel name
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Empty(kind));
    }
    if name.trim() != name {
        return Err(NameValidationError::SurroundingWhitespace(kind));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameValidationError::TooLong(kind, len));
    }
    Ok(())
}

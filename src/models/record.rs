//! Human-readable transaction records
//!
//! A user's history is a list of display strings, e.g.
//! `Contributed R100.00 to SavingsCircle on 2026-10-19 14:03`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::{Money, DEFAULT_CURRENCY_SYMBOL};

/// How amounts and dates are rendered into transaction records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStyle {
    pub currency_symbol: String,
    /// strftime format, rendered in local time
    pub date_format: String,
}

impl Default for RecordStyle {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl RecordStyle {
    pub fn amount(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Reject a `date_format` chrono cannot render
    pub fn validate(&self) -> Result<(), String> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("Invalid date format: {}", self.date_format));
        }
        Ok(())
    }

    /// Only call on a style that passed [`validate`](Self::validate)
    pub fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&Local).format(&self.date_format).to_string()
    }
}

/// One entry of a user's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(String);

impl TransactionRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Record of a contribution into a stokvel
    pub fn contribution(
        amount: Money,
        stokvel: &str,
        at: DateTime<Utc>,
        style: &RecordStyle,
    ) -> Self {
        Self(format!(
            "Contributed {} to {} on {}",
            style.amount(amount),
            stokvel,
            style.date(at)
        ))
    }

    /// Record of a deposit into the user's own wallet
    pub fn deposit(amount: Money, at: DateTime<Utc>, style: &RecordStyle) -> Self {
        Self(format!(
            "Deposited {} on {}",
            style.amount(amount),
            style.date(at)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

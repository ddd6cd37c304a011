//! Stokvel registry
//!
//! Creating groups, joining them, contributing to them and summarising them.
//! All checks run before any mutation, so a failed call leaves both the
//! stokvel and its members untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{StokwellError, StokwellResult};
use crate::models::{
    validate_name, Contribution, LedgerState, Money, RecordStyle, Stokvel, TransactionRecord,
};
use crate::services::user;

/// Read-only view of a stokvel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StokvelSummary {
    pub name: String,
    pub balance: Money,
    /// Recomputed from the contributions; always equals `balance`
    pub total_contributions: Money,
    pub contribution_count: usize,
    pub member_count: usize,
    pub members: Vec<String>,
    pub created_date: DateTime<Utc>,
    pub created_by: String,
}

/// Result of a successful contribution
#[derive(Debug, Clone)]
pub struct ContributionReceipt {
    pub contribution: Contribution,
    /// Stokvel balance after the contribution
    pub balance: Money,
    pub message: String,
}

/// Create a stokvel with the creator as its first member
pub fn create<'a>(
    state: &'a mut LedgerState,
    name: &str,
    creator: &str,
) -> StokwellResult<&'a Stokvel> {
    validate_name("Stokvel name", name).map_err(|e| StokwellError::Validation(e.to_string()))?;

    if state.stokvels.contains_key(name) {
        return Err(StokwellError::DuplicateStokvel(name.to_string()));
    }
    let user = state
        .users
        .get_mut(creator)
        .ok_or_else(|| StokwellError::UserNotFound(creator.to_string()))?;

    user.stokvels.push(name.to_string());
    Ok(state
        .stokvels
        .entry(name.to_string())
        .or_insert_with(|| Stokvel::new(name, creator)))
}

/// Add an existing user to an existing stokvel
pub fn join<'a>(
    state: &'a mut LedgerState,
    name: &str,
    username: &str,
) -> StokwellResult<&'a Stokvel> {
    let stokvel = state
        .stokvels
        .get_mut(name)
        .ok_or_else(|| StokwellError::StokvelNotFound(name.to_string()))?;
    if stokvel.has_member(username) {
        return Err(StokwellError::already_member(username, name));
    }
    let user = state
        .users
        .get_mut(username)
        .ok_or_else(|| StokwellError::UserNotFound(username.to_string()))?;

    user.stokvels.push(name.to_string());
    stokvel.members.push(username.to_string());
    Ok(stokvel)
}

/// Record a member's contribution
///
/// Grows the stokvel balance, appends the contribution and appends a
/// transaction record to the member's history.
pub fn contribute(
    state: &mut LedgerState,
    name: &str,
    amount: Money,
    username: &str,
    style: &RecordStyle,
) -> StokwellResult<ContributionReceipt> {
    let stokvel = state
        .stokvels
        .get_mut(name)
        .ok_or_else(|| StokwellError::StokvelNotFound(name.to_string()))?;
    if !stokvel.has_member(username) {
        return Err(StokwellError::not_a_member(username, name));
    }
    if !amount.is_positive() {
        return Err(StokwellError::InvalidAmount(
            "Amount must be positive".into(),
        ));
    }
    if stokvel.balance.checked_add(amount).is_none() {
        return Err(StokwellError::InvalidAmount("Amount is too large".into()));
    }
    if !state.users.contains_key(username) {
        return Err(StokwellError::UserNotFound(username.to_string()));
    }

    let now = Utc::now();
    let contribution = stokvel.record_contribution(username, amount, now).clone();
    let balance = stokvel.balance;
    user::add_transaction(
        state,
        username,
        TransactionRecord::contribution(amount, name, now, style),
    )?;

    Ok(ContributionReceipt {
        contribution,
        balance,
        message: format!("You contributed {} to {}.", style.amount(amount), name),
    })
}

/// Summarise a stokvel, or `None` if it doesn't exist
pub fn summary(state: &LedgerState, name: &str) -> Option<StokvelSummary> {
    let stokvel = state.stokvels.get(name)?;
    Some(StokvelSummary {
        name: stokvel.name.clone(),
        balance: stokvel.balance,
        total_contributions: stokvel.total_contributions(),
        contribution_count: stokvel.contributions.len(),
        member_count: stokvel.member_count(),
        members: stokvel.members.clone(),
        created_date: stokvel.created_date,
        created_by: stokvel.created_by.clone(),
    })
}

/// Stokvels a user belongs to, in the order they joined
pub fn stokvels_for<'a>(state: &'a LedgerState, username: &str) -> Vec<&'a Stokvel> {
    state
        .users
        .get(username)
        .map(|user| {
            user.stokvels
                .iter()
                .filter_map(|name| state.stokvels.get(name))
                .collect()
        })
        .unwrap_or_default()
}

/// A member's contributions to one stokvel, oldest first
pub fn contributions_by<'a>(
    state: &'a LedgerState,
    name: &str,
    username: &'a str,
) -> StokwellResult<Vec<&'a Contribution>> {
    let stokvel = state
        .stokvels
        .get(name)
        .ok_or_else(|| StokwellError::StokvelNotFound(name.to_string()))?;
    Ok(stokvel.contributions_by(username).collect())
}

/// Parse raw user input into a contribution amount
///
/// Rejects unparseable and non-positive input.
pub fn parse_amount(input: &str) -> StokwellResult<Money> {
    let amount = Money::parse(input)
        .map_err(|_| StokwellError::InvalidAmount("Invalid amount format".into()))?;
    if !amount.is_positive() {
        return Err(StokwellError::InvalidAmount(
            "Amount must be positive".into(),
        ));
    }
    Ok(amount)
}

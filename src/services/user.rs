//! User registry
//!
//! Registration, login and per-user history. Every function validates first
//! and only then mutates, so a failed call leaves the state untouched.

use chrono::Utc;
use tracing::warn;

use crate::crypto::{hash_password, verify_password};
use crate::error::{StokwellError, StokwellResult};
use crate::models::{validate_name, LedgerState, Money, RecordStyle, TransactionRecord, User};

/// Create a new user with zero balance and no history
pub fn register<'a>(
    state: &'a mut LedgerState,
    username: &str,
    password: &str,
) -> StokwellResult<&'a User> {
    validate_name("Username", username).map_err(|e| StokwellError::Validation(e.to_string()))?;
    if password.is_empty() {
        return Err(StokwellError::Validation("Password cannot be empty".into()));
    }

    if state.users.contains_key(username) {
        return Err(StokwellError::DuplicateUser(username.to_string()));
    }

    let user = User::new(username, hash_password(password));
    Ok(state.users.entry(username.to_string()).or_insert(user))
}

/// Authenticate a user
///
/// Unknown usernames and wrong passwords produce the same error.
pub fn login<'a>(
    state: &'a LedgerState,
    username: &str,
    password: &str,
) -> StokwellResult<&'a User> {
    match state.users.get(username) {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => {
            warn!("rejected login attempt");
            Err(StokwellError::InvalidCredentials)
        }
    }
}

pub fn get<'a>(state: &'a LedgerState, username: &str) -> Option<&'a User> {
    state.users.get(username)
}

/// Append a record to a user's transaction history
pub fn add_transaction(
    state: &mut LedgerState,
    username: &str,
    record: TransactionRecord,
) -> StokwellResult<()> {
    let user = state
        .users
        .get_mut(username)
        .ok_or_else(|| StokwellError::UserNotFound(username.to_string()))?;
    user.push_transaction(record);
    Ok(())
}

/// Add funds to a user's own wallet balance
pub fn deposit<'a>(
    state: &'a mut LedgerState,
    username: &str,
    amount: Money,
    style: &RecordStyle,
) -> StokwellResult<&'a User> {
    if !amount.is_positive() {
        return Err(StokwellError::InvalidAmount(
            "Amount must be positive".into(),
        ));
    }

    let user = state
        .users
        .get_mut(username)
        .ok_or_else(|| StokwellError::UserNotFound(username.to_string()))?;

    let new_balance = user
        .balance
        .checked_add(amount)
        .ok_or_else(|| StokwellError::InvalidAmount("Amount is too large".into()))?;

    user.balance = new_balance;
    user.push_transaction(TransactionRecord::deposit(amount, Utc::now(), style));
    Ok(user)
}

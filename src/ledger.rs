//! Ledger facade
//!
//! Owns the in-memory [`LedgerState`] behind a single `RwLock` and is the
//! only place where state changes are persisted. Every mutation runs under
//! the write guard: the registry operation is applied, the whole state is
//! saved, and only then is the audit entry appended. If the save fails the
//! state is rolled back to what it was before the call.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{Settings, StokwellPaths};
use crate::crypto::DerivedKey;
use crate::error::{StokwellError, StokwellResult};
use crate::models::{Contribution, LedgerState, Money, RecordStyle, TransactionRecord};
use crate::services::{self, ContributionReceipt, StokvelSummary};
use crate::storage::LedgerStore;

/// Result of a successful facade operation
///
/// `message` is meant to be shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T = ()> {
    pub message: String,
    pub value: T,
}

impl<T> Outcome<T> {
    fn new(message: impl Into<String>, value: T) -> Self {
        Self {
            message: message.into(),
            value,
        }
    }
}

/// Everything the home screen shows for a logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub balance: Money,
    /// Newest last
    pub recent_transactions: Vec<TransactionRecord>,
    pub stokvels: Vec<StokvelSummary>,
}

/// The stokvel ledger with write-through persistence
pub struct Ledger {
    state: RwLock<LedgerState>,
    store: LedgerStore,
    audit: Option<AuditLogger>,
    style: RecordStyle,
    recent_transactions: usize,
}

impl Ledger {
    /// Load the ledger from `store`
    pub fn new(store: LedgerStore, style: RecordStyle) -> StokwellResult<Self> {
        style.validate().map_err(StokwellError::Config)?;
        let state = store.load()?;
        Ok(Self {
            state: RwLock::new(state),
            store,
            audit: None,
            style,
            recent_transactions: 5,
        })
    }

    /// Append an audit entry for every successful mutation
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Open the ledger in a data directory using the user's settings
    pub fn open(
        paths: &StokwellPaths,
        settings: &Settings,
        key: Option<DerivedKey>,
    ) -> StokwellResult<Self> {
        paths.ensure_directories()?;

        let mut store = LedgerStore::new(paths.ledger_file());
        store.set_key(key);

        let mut ledger = Self::new(store, settings.record_style())?
            .with_audit(AuditLogger::new(paths.audit_log()));
        ledger.recent_transactions = settings.recent_transactions;
        Ok(ledger)
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn style(&self) -> &RecordStyle {
        &self.style
    }

    fn read(&self) -> StokwellResult<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| StokwellError::Persistence("Ledger lock poisoned".into()))
    }

    fn write(&self) -> StokwellResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| StokwellError::Persistence("Ledger lock poisoned".into()))
    }

    /// Apply `op`, persist, then audit
    ///
    /// On a domain error nothing is saved. On a save failure the state is
    /// restored to its value before the call and the error propagates.
    fn mutate<T, F>(&self, op: F) -> StokwellResult<T>
    where
        F: FnOnce(&mut LedgerState, &RecordStyle) -> StokwellResult<(T, AuditEntry)>,
    {
        let mut state = self.write()?;
        let before = state.clone();

        let (value, entry) = match op(&mut *state, &self.style) {
            Ok(done) => done,
            Err(e) => {
                *state = before;
                warn!(error = %e, "operation rejected");
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&state) {
            *state = before;
            warn!(error = %e, "save failed, changes rolled back");
            return Err(e);
        }

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }

        info!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "ledger updated"
        );
        Ok(value)
    }

    /// Register a new user
    pub fn register(&self, username: &str, password: &str) -> StokwellResult<Outcome> {
        self.mutate(|state, _| {
            services::user::register(state, username, password)?;
            Ok((
                Outcome::new(format!("User {} registered successfully!", username), ()),
                AuditEntry::create(EntityType::User, username).details("registered"),
            ))
        })
    }

    /// Check a user's credentials; never touches the disk
    pub fn login(&self, username: &str, password: &str) -> StokwellResult<Outcome> {
        let state = self.read()?;
        services::user::login(&state, username, password)?;
        debug!(user = username, "login succeeded");
        Ok(Outcome::new(format!("Welcome back, {}!", username), ()))
    }

    /// Create a stokvel with `creator` as its first member
    pub fn create_stokvel(
        &self,
        name: &str,
        creator: &str,
    ) -> StokwellResult<Outcome<StokvelSummary>> {
        self.mutate(|state, _| {
            services::stokvel::create(state, name, creator)?;
            let summary = summary_or_missing(state, name)?;
            let entry = AuditEntry::create(EntityType::Stokvel, name)
                .by(creator)
                .snapshot(&summary);
            Ok((
                Outcome::new(
                    format!("Stokvel '{}' created and you have joined it!", name),
                    summary,
                ),
                entry,
            ))
        })
    }

    /// Add a user to an existing stokvel
    pub fn join_stokvel(
        &self,
        name: &str,
        username: &str,
    ) -> StokwellResult<Outcome<StokvelSummary>> {
        self.mutate(|state, _| {
            services::stokvel::join(state, name, username)?;
            let summary = summary_or_missing(state, name)?;
            let entry = AuditEntry::update(EntityType::Stokvel, name)
                .by(username)
                .details("joined");
            Ok((
                Outcome::new(format!("You have joined {}!", name), summary),
                entry,
            ))
        })
    }

    /// Record a member's contribution to a stokvel
    pub fn contribute(
        &self,
        name: &str,
        amount: Money,
        username: &str,
    ) -> StokwellResult<Outcome<ContributionReceipt>> {
        self.mutate(|state, style| {
            let receipt = services::stokvel::contribute(state, name, amount, username, style)?;
            let entry = AuditEntry::update(EntityType::Stokvel, name)
                .by(username)
                .details(format!("contributed {}", style.amount(amount)))
                .snapshot(&receipt.contribution);
            Ok((Outcome::new(receipt.message.clone(), receipt), entry))
        })
    }

    /// Add funds to a user's own wallet; the value is the new balance
    pub fn deposit(&self, username: &str, amount: Money) -> StokwellResult<Outcome<Money>> {
        self.mutate(|state, style| {
            let balance = services::user::deposit(state, username, amount, style)?.balance;
            let entry = AuditEntry::update(EntityType::User, username)
                .by(username)
                .details(format!("deposited {}", style.amount(amount)));
            Ok((
                Outcome::new(
                    format!(
                        "Deposited {}. New balance: {}.",
                        style.amount(amount),
                        style.amount(balance)
                    ),
                    balance,
                ),
                entry,
            ))
        })
    }

    /// Summary of a stokvel, or `None` if it doesn't exist
    pub fn summary(&self, name: &str) -> StokwellResult<Option<StokvelSummary>> {
        let state = self.read()?;
        Ok(services::stokvel::summary(&state, name))
    }

    /// Summaries of every stokvel, ordered by name
    pub fn all_stokvels(&self) -> StokwellResult<Vec<StokvelSummary>> {
        let state = self.read()?;
        Ok(state
            .stokvels
            .keys()
            .filter_map(|name| services::stokvel::summary(&state, name))
            .collect())
    }

    /// Summaries of the stokvels a user belongs to, in joining order
    pub fn user_stokvels(&self, username: &str) -> StokwellResult<Vec<StokvelSummary>> {
        let state = self.read()?;
        if services::user::get(&state, username).is_none() {
            return Err(StokwellError::UserNotFound(username.to_string()));
        }
        Ok(services::stokvel::stokvels_for(&state, username)
            .into_iter()
            .filter_map(|s| services::stokvel::summary(&state, &s.name))
            .collect())
    }

    /// Balance, recent history and stokvels for one user
    pub fn dashboard(&self, username: &str) -> StokwellResult<Dashboard> {
        let stokvels = self.user_stokvels(username)?;
        let state = self.read()?;
        let user = services::user::get(&state, username)
            .ok_or_else(|| StokwellError::UserNotFound(username.to_string()))?;

        Ok(Dashboard {
            username: user.username.clone(),
            balance: user.balance,
            recent_transactions: user.recent_transactions(self.recent_transactions).to_vec(),
            stokvels,
        })
    }

    /// A member's contributions to one stokvel, oldest first
    pub fn contributions_by(&self, name: &str, username: &str) -> StokwellResult<Vec<Contribution>> {
        let state = self.read()?;
        Ok(services::stokvel::contributions_by(&state, name, username)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Copy of the whole current state
    pub fn snapshot(&self) -> StokwellResult<LedgerState> {
        Ok(self.read()?.clone())
    }

    /// Rewrite the ledger file sealed with `key`, or in plain JSON for `None`
    pub fn reseal(&mut self, key: Option<DerivedKey>) -> StokwellResult<()> {
        let state = self.snapshot()?;
        self.store.set_key(key);
        self.store.save(&state)?;
        info!(encrypted = self.store.is_encrypted(), "ledger file rewritten");
        Ok(())
    }
}

fn summary_or_missing(state: &LedgerState, name: &str) -> StokwellResult<StokvelSummary> {
    services::stokvel::summary(state, name)
        .ok_or_else(|| StokwellError::StokvelNotFound(name.to_string()))
}

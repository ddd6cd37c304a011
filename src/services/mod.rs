//! Business logic layer
//!
//! Registry operations over an explicit [`LedgerState`](crate::models::LedgerState).
//! They never touch the disk; persistence is the job of the
//! [`Ledger`](crate::ledger::Ledger) facade.

pub mod stokvel;
pub mod user;

pub use stokvel::{ContributionReceipt, StokvelSummary};

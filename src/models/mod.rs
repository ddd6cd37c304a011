//! Core data models for StokWELL
//!
//! Users, stokvels, contributions, transaction records and the ledger state
//! that holds them all.

pub mod ids;
pub mod money;
pub mod record;
pub mod state;
pub mod stokvel;
pub mod user;

pub use ids::ContributionId;
pub use money::{Money, MoneyParseError};
pub use record::{RecordStyle, TransactionRecord};
pub use state::{ConsistencyError, LedgerState};
pub use stokvel::{Contribution, Stokvel};
pub use user::{validate_name, NameValidationError, User};

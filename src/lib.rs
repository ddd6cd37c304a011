//! StokWELL - ledger for stokvels (community savings groups)
//!
//! Users register and log in, create or join stokvels, and record
//! contributions. Everything lives in one JSON ledger file that is rewritten
//! atomically after every change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Users, stokvels, contributions and the ledger state
//! - `crypto`: Password digests and optional ledger encryption
//! - `storage`: Atomic JSON persistence of the ledger state
//! - `services`: User and stokvel registries
//! - `ledger`: The facade that applies, persists and audits changes
//! - `audit`: Append-only audit log
//! - `backup`: Rolling backups and restore
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `stokwell` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use stokwell::config::{Settings, StokwellPaths};
//! use stokwell::ledger::Ledger;
//! use stokwell::models::Money;
//!
//! let paths = StokwellPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let ledger = Ledger::open(&paths, &settings, None)?;
//!
//! ledger.register("alice", "pw1")?;
//! ledger.create_stokvel("SavingsCircle", "alice")?;
//! let outcome = ledger.contribute("SavingsCircle", Money::from_cents(10000), "alice")?;
//! println!("{}", outcome.message);
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{StokwellError, StokwellResult};
pub use ledger::{Ledger, Outcome};

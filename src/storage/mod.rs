//! Storage layer for StokWELL
//!
//! The whole ledger lives in a single JSON file that is rewritten atomically
//! on every mutation.

pub mod file_io;
pub mod ledger;

pub use file_io::{read_json, write_json_atomic};
pub use ledger::LedgerStore;

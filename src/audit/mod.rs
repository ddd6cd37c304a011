//! Audit logging system for StokWELL
//!
//! Every successful registration, stokvel creation, join, contribution,
//! deposit and restore is appended to a line-delimited JSON log.
//!
//! - `AuditEntry`: one operation with timestamp, entity, actor and an
//!   optional snapshot.
//! - `AuditLogger`: appends entries to, and reads them back from, the log
//!   file.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

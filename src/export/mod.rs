//! Export module for StokWELL
//!
//! - CSV: contributions and member totals (spreadsheet-compatible)
//! - JSON: machine-readable full ledger export
//! - YAML: human-readable full ledger export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_contributions_csv, export_members_csv};
pub use json::{export_full_json, ExportedUser, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

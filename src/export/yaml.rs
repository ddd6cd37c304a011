//! YAML Export functionality
//!
//! Exports the complete ledger to YAML for human-readable archiving.

use std::io::Write;

use crate::error::{StokwellError, StokwellResult};
use crate::export::json::FullExport;
use crate::models::LedgerState;

/// Export the full ledger to YAML format
pub fn export_full_yaml<W: Write>(state: &LedgerState, writer: &mut W) -> StokwellResult<()> {
    let export = FullExport::from_state(state);
    let io_err = |e: std::io::Error| StokwellError::Export(e.to_string());

    writeln!(writer, "# StokWELL Ledger Export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| StokwellError::Export(e.to_string()))?;

    Ok(())
}

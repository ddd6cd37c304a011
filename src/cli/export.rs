//! CLI commands for data export
//!
//! Writes to a file when an output path is given, otherwise to stdout.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::error::{StokwellError, StokwellResult};
use crate::export::{csv, json, yaml};
use crate::ledger::Ledger;

/// Full export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every contribution to CSV
    Contributions {
        /// Output file path
        output: Option<PathBuf>,
    },

    /// Export per-member contribution totals to CSV
    Members {
        /// Output file path
        output: Option<PathBuf>,
    },

    /// Export the whole ledger (without password digests)
    Full {
        /// Output file path
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(ledger: &Ledger, cmd: ExportCommands) -> StokwellResult<()> {
    let state = ledger.snapshot()?;

    let (output, what) = match &cmd {
        ExportCommands::Contributions { output } => (output, "Contributions"),
        ExportCommands::Members { output } => (output, "Member totals"),
        ExportCommands::Full { output, .. } => (output, "Full ledger"),
    };
    let mut writer = open_output(output.as_ref())?;

    match &cmd {
        ExportCommands::Contributions { .. } => csv::export_contributions_csv(&state, &mut writer)?,
        ExportCommands::Members { .. } => csv::export_members_csv(&state, &mut writer)?,
        ExportCommands::Full { format, pretty, .. } => match format {
            ExportFormat::Json => json::export_full_json(&state, &mut writer, *pretty)?,
            ExportFormat::Yaml => yaml::export_full_yaml(&state, &mut writer)?,
        },
    }
    writer
        .flush()
        .map_err(|e| StokwellError::Export(e.to_string()))?;

    if let Some(path) = output {
        println!("{} exported to: {}", what, path.display());
    }
    Ok(())
}

fn open_output(output: Option<&PathBuf>) -> StokwellResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                StokwellError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

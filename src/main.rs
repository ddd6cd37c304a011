use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stokwell::cli::{
    handle_backup_command, handle_encrypt_command, handle_export_command, handle_stokvel_command,
    handle_user_command, open_ledger,
};
use stokwell::config::{Settings, StokwellPaths};
use stokwell::StokwellError;

/// Exit status for a rejected operation such as bad input or an unknown stokvel
const EXIT_REJECTED: u8 = 1;
/// Exit status for storage, configuration and other fatal failures
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(
    name = "stokwell",
    version,
    about = "Stokvel savings-group ledger",
    long_about = "StokWELL keeps the books for stokvels: community savings groups whose \
                  members pool regular contributions. Register, create or join a stokvel, \
                  and record contributions from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Registration, login, deposits and your dashboard
    #[command(subcommand)]
    User(stokwell::cli::UserCommands),

    /// Create, join, contribute to and view stokvels
    #[command(subcommand)]
    Stokvel(stokwell::cli::StokvelCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(stokwell::cli::BackupCommands),

    /// Export the ledger to CSV, JSON or YAML
    #[command(subcommand)]
    Export(stokwell::cli::ExportCommands),

    /// At-rest encryption of the ledger file
    #[command(subcommand)]
    Encrypt(stokwell::cli::EncryptCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let rejected = err
                .downcast_ref::<StokwellError>()
                .map_or(false, StokwellError::is_domain);
            if rejected {
                eprintln!("{}", err);
                ExitCode::from(EXIT_REJECTED)
            } else {
                eprintln!("Error: {:#}", err);
                ExitCode::from(EXIT_FATAL)
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = StokwellPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::User(cmd)) => {
            let ledger = open_ledger(&paths, &settings)?;
            handle_user_command(&ledger, cmd)?;
        }
        Some(Commands::Stokvel(cmd)) => {
            let ledger = open_ledger(&paths, &settings)?;
            handle_stokvel_command(&ledger, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            let ledger = open_ledger(&paths, &settings)?;
            handle_export_command(&ledger, cmd)?;
        }
        Some(Commands::Encrypt(cmd)) => {
            handle_encrypt_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("StokWELL Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Ledger file:      {}", paths.ledger_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Recent transactions: {}", settings.recent_transactions);
            println!(
                "  Backup retention:    {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
            println!("  Encryption enabled:  {}", settings.is_encryption_enabled());
        }
        None => {
            println!("StokWELL - stokvel savings ledger");
            println!();
            println!("Run 'stokwell --help' for usage information.");
        }
    }

    Ok(())
}

//! Stokvel CLI commands
//!
//! Implements CLI commands for creating, joining and contributing to
//! stokvels, and for viewing them.

use clap::Subcommand;

use super::Credentials;
use crate::display::{format_stokvel_details, format_stokvel_list};
use crate::error::{StokwellError, StokwellResult};
use crate::ledger::Ledger;
use crate::services::stokvel::parse_amount;

/// Stokvel subcommands
#[derive(Subcommand, Debug)]
pub enum StokvelCommands {
    /// Create a new stokvel and join it
    Create {
        /// Stokvel name (case-sensitive)
        name: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Join an existing stokvel
    Join {
        name: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Contribute to a stokvel you belong to
    Contribute {
        name: String,

        /// Amount, e.g. "100" or "R100.50"
        amount: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Show a stokvel's summary
    Show {
        name: String,

        /// Also list this member's own contributions
        #[arg(short, long)]
        member: Option<String>,
    },

    /// List stokvels
    List {
        /// Only stokvels this user belongs to
        #[arg(short, long)]
        member: Option<String>,
    },
}

/// Handle a stokvel command
pub fn handle_stokvel_command(ledger: &Ledger, cmd: StokvelCommands) -> StokwellResult<()> {
    match cmd {
        StokvelCommands::Create { name, credentials } => {
            credentials.authenticate(ledger)?;
            let outcome = ledger.create_stokvel(&name, &credentials.user)?;
            println!("{}", outcome.message);
        }

        StokvelCommands::Join { name, credentials } => {
            credentials.authenticate(ledger)?;
            let outcome = ledger.join_stokvel(&name, &credentials.user)?;
            println!("{}", outcome.message);
            println!(
                "{} now has {} members.",
                outcome.value.name, outcome.value.member_count
            );
        }

        StokvelCommands::Contribute {
            name,
            amount,
            credentials,
        } => {
            credentials.authenticate(ledger)?;
            let amount = parse_amount(&amount)?;
            let outcome = ledger.contribute(&name, amount, &credentials.user)?;
            println!("{}", outcome.message);
            println!(
                "New stokvel balance: {}",
                ledger.style().amount(outcome.value.balance)
            );
        }

        StokvelCommands::Show { name, member } => {
            let summary = ledger
                .summary(&name)?
                .ok_or_else(|| StokwellError::StokvelNotFound(name.clone()))?;
            let own = match member {
                Some(username) => ledger.contributions_by(&name, &username)?,
                None => Vec::new(),
            };
            print!("{}", format_stokvel_details(&summary, &own, ledger.style()));
        }

        StokvelCommands::List { member } => {
            let summaries = match member {
                Some(username) => ledger.user_stokvels(&username)?,
                None => ledger.all_stokvels()?,
            };
            print!("{}", format_stokvel_list(&summaries, ledger.style()));
        }
    }

    Ok(())
}

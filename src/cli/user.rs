//! User CLI commands
//!
//! Registration, login, wallet deposits and the dashboard.

use clap::Subcommand;
use zeroize::Zeroizing;

use super::{secret_or_prompt, Credentials};
use crate::display::format_dashboard;
use crate::error::{StokwellError, StokwellResult};
use crate::ledger::Ledger;
use crate::models::Money;

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Username (case-sensitive)
        username: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "STOKWELL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Check credentials and show the dashboard
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Add funds to your wallet
    Deposit {
        /// Amount, e.g. "50" or "R50.00"
        amount: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Show your dashboard
    Show {
        #[command(flatten)]
        credentials: Credentials,
    },
}

/// Handle a user command
pub fn handle_user_command(ledger: &Ledger, cmd: UserCommands) -> StokwellResult<()> {
    match cmd {
        UserCommands::Register { username, password } => {
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => {
                    let first = secret_or_prompt(None, "Password: ")?;
                    let second = secret_or_prompt(None, "Confirm password: ")?;
                    if *first != *second {
                        return Err(StokwellError::Validation("Passwords do not match".into()));
                    }
                    first
                }
            };
            let outcome = ledger.register(&username, &password)?;
            println!("{}", outcome.message);
        }

        UserCommands::Login { credentials } => {
            println!("{}", credentials.authenticate(ledger)?);
            print!("{}", format_dashboard(&ledger.dashboard(&credentials.user)?, ledger.style()));
        }

        UserCommands::Deposit {
            amount,
            credentials,
        } => {
            credentials.authenticate(ledger)?;
            let amount = Money::parse(&amount).map_err(|_| {
                StokwellError::InvalidAmount("Invalid amount format".into())
            })?;
            let outcome = ledger.deposit(&credentials.user, amount)?;
            println!("{}", outcome.message);
        }

        UserCommands::Show { credentials } => {
            credentials.authenticate(ledger)?;
            print!("{}", format_dashboard(&ledger.dashboard(&credentials.user)?, ledger.style()));
        }
    }

    Ok(())
}

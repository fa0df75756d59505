//! Income CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_allocation;
use crate::engine::{ResidualPolicy, SplitOptions, SplitPolicy};
use crate::error::{CashplanError, CashplanResult};
use crate::services::IncomeService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Split an amount across the active buckets and add it to their balances
    Split {
        /// Amount received
        amount: String,
        /// Date received (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Ledger description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
        /// Override the split policy (normalize_all, priority_tier)
        #[arg(short, long)]
        policy: Option<String>,
        /// Override the residual policy (keep, largest_share)
        #[arg(short, long)]
        residual: Option<String>,
        /// Show the split without booking it
        #[arg(long)]
        dry_run: bool,
    },
}

fn split_options(
    settings: &Settings,
    policy: Option<&str>,
    residual: Option<&str>,
) -> CashplanResult<SplitOptions> {
    let mut options = settings.split_options();

    if let Some(policy) = policy {
        options.policy = SplitPolicy::parse(policy).ok_or_else(|| {
            CashplanError::InvalidInput(format!(
                "unknown split policy '{}'. Valid policies: normalize_all, priority_tier",
                policy
            ))
        })?;
    }
    if let Some(residual) = residual {
        options.residual = ResidualPolicy::parse(residual).ok_or_else(|| {
            CashplanError::InvalidInput(format!(
                "unknown residual policy '{}'. Valid policies: keep, largest_share",
                residual
            ))
        })?;
    }

    Ok(options)
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> CashplanResult<()> {
    let service = IncomeService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::Split {
            amount,
            date,
            description,
            policy,
            residual,
            dry_run,
        } => {
            let amount = parse_amount("amount", &amount)?;
            let options = split_options(settings, policy.as_deref(), residual.as_deref())?;

            if dry_run {
                let allocation = service.preview(amount, options)?;
                print!("{}", format_allocation(&allocation, symbol));
                println!("(dry run, nothing booked)");
                return Ok(());
            }

            let date = parse_date(date.as_deref())?;
            let applied = service.apply(amount, date, &description, options)?;
            print!("{}", format_allocation(&applied.allocation, symbol));
            println!(
                "Booked {} ledger entries for {}",
                applied.entries.len(),
                date.format("%Y-%m-%d")
            );
        }
    }

    Ok(())
}

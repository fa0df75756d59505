//! Ledger CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_ledger;
use crate::error::CashplanResult;
use crate::services::{BucketService, LedgerService};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Ledger subcommands
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Add money to a bucket
    Income {
        /// Bucket name or ID
        bucket: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// Spend money from a bucket
    Expense {
        /// Bucket name or ID
        bucket: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long, default_value = "")]
        description: String,
        /// Allow the balance to go negative
        #[arg(long)]
        allow_negative: bool,
    },
    /// Move money between buckets
    Transfer {
        /// Source bucket
        from: String,
        /// Destination bucket
        to: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long, default_value = "")]
        description: String,
        /// Allow the source balance to go negative
        #[arg(long)]
        allow_negative: bool,
    },
    /// List ledger entries
    List {
        /// Only entries for this bucket
        #[arg(short, long)]
        bucket: Option<String>,
        /// Number of most recent entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Compare a bucket's stored balance with the sum of its ledger entries
    Reconcile {
        /// Bucket name or ID
        bucket: String,
    },
}

/// Handle a ledger command
pub fn handle_ledger_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LedgerCommands,
) -> CashplanResult<()> {
    let buckets = BucketService::new(storage);
    let service = LedgerService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        LedgerCommands::Income {
            bucket,
            amount,
            date,
            description,
        } => {
            let target = buckets.resolve(&bucket)?;
            let amount = parse_amount("amount", &amount)?;
            let date = parse_date(date.as_deref())?;

            service.record_income(target.id, amount, date, &description)?;
            println!(
                "Added {} to {}",
                amount.format_with_symbol(symbol),
                target.name
            );
        }

        LedgerCommands::Expense {
            bucket,
            amount,
            date,
            description,
            allow_negative,
        } => {
            let target = buckets.resolve(&bucket)?;
            let amount = parse_amount("amount", &amount)?;
            let date = parse_date(date.as_deref())?;

            service.record_expense(
                target.id,
                amount,
                date,
                &description,
                allow_negative || settings.allow_negative_balances,
            )?;
            println!(
                "Spent {} from {}",
                amount.format_with_symbol(symbol),
                target.name
            );
        }

        LedgerCommands::Transfer {
            from,
            to,
            amount,
            date,
            description,
            allow_negative,
        } => {
            let source = buckets.resolve(&from)?;
            let destination = buckets.resolve(&to)?;
            let amount = parse_amount("amount", &amount)?;
            let date = parse_date(date.as_deref())?;

            service.transfer(
                source.id,
                destination.id,
                amount,
                date,
                &description,
                allow_negative || settings.allow_negative_balances,
            )?;
            println!(
                "Moved {} from {} to {}",
                amount.format_with_symbol(symbol),
                source.name,
                destination.name
            );
        }

        LedgerCommands::List { bucket, limit } => {
            let bucket_id = match bucket {
                Some(name) => Some(buckets.resolve(&name)?.id),
                None => None,
            };

            let mut entries = service.history(bucket_id)?;
            entries.truncate(limit);

            let all_buckets = buckets.list(true)?;
            print!("{}", format_ledger(&entries, &all_buckets, symbol));
        }

        LedgerCommands::Reconcile { bucket } => {
            let target = buckets.resolve(&bucket)?;
            let (stored, from_ledger) = service.reconcile(target.id)?;

            println!("Bucket:        {}", target.name);
            println!("Stored:        {}", stored.format_with_symbol(symbol));
            println!("From ledger:   {}", from_ledger.format_with_symbol(symbol));
            if stored == from_ledger {
                println!("Balanced.");
            } else {
                println!(
                    "Off by {}",
                    (stored - from_ledger).format_with_symbol(symbol)
                );
            }
        }
    }

    Ok(())
}

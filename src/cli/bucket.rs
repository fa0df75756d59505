//! Bucket CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_bucket_details, format_bucket_list, report::format_percentage};
use crate::error::CashplanResult;
use crate::services::{BucketService, BucketUpdate, NewBucket};
use crate::storage::Storage;

/// Bucket subcommands
#[derive(Subcommand)]
pub enum BucketCommands {
    /// Create a new bucket
    Create {
        /// Bucket name
        name: String,
        /// Weight on a 0-100 scale
        percent: f64,
        /// Fund this bucket first, from the untouched income
        #[arg(long)]
        skim: bool,
        /// Free-form kind label
        #[arg(short, long)]
        kind: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List buckets
    List {
        /// Include inactive buckets
        #[arg(short, long)]
        all: bool,
    },
    /// Show bucket details
    Show {
        /// Bucket name or ID
        bucket: String,
    },
    /// Edit a bucket
    Edit {
        /// Bucket name or ID
        bucket: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        percent: Option<f64>,
        /// Set or clear the skim-first flag
        #[arg(long)]
        skim: Option<bool>,
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rescale the active buckets' percents so they sum to 100
    Normalize,
    /// Stop sending income to a bucket
    Deactivate {
        /// Bucket name or ID
        bucket: String,
    },
    /// Resume sending income to a bucket
    Activate {
        /// Bucket name or ID
        bucket: String,
    },
    /// Delete a bucket
    Delete {
        /// Bucket name or ID
        bucket: String,
        /// Delete even if the bucket still holds money
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a bucket command
pub fn handle_bucket_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BucketCommands,
) -> CashplanResult<()> {
    let service = BucketService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BucketCommands::Create {
            name,
            percent,
            skim,
            kind,
            description,
        } => {
            let bucket = service.create(NewBucket {
                name,
                percent,
                priority_pre: skim,
                kind,
                description,
            })?;

            println!("Created bucket: {}", bucket.name);
            println!("  Percent: {}", format_percentage(bucket.percent));
            if bucket.priority_pre {
                println!("  Skimmed first from every split");
            }
            println!("  ID: {}", bucket.id);
            println!(
                "Active percent sum is now {}",
                format_percentage(service.percent_sum()?)
            );
        }

        BucketCommands::List { all } => {
            let buckets = service.list(all)?;
            print!("{}", format_bucket_list(&buckets, symbol));
        }

        BucketCommands::Show { bucket } => {
            let found = service.resolve(&bucket)?;
            print!("{}", format_bucket_details(&found, symbol));
        }

        BucketCommands::Edit {
            bucket,
            name,
            percent,
            skim,
            kind,
            description,
        } => {
            let found = service.resolve(&bucket)?;
            let update = BucketUpdate {
                name,
                percent,
                priority_pre: skim,
                kind,
                description,
            };

            if update.name.is_none()
                && update.percent.is_none()
                && update.priority_pre.is_none()
                && update.kind.is_none()
                && update.description.is_none()
            {
                println!("No changes specified. Use --name, --percent, --skim, --kind or --description.");
                return Ok(());
            }

            let updated = service.update(found.id, update)?;
            println!("Updated bucket: {}", updated.name);
        }

        BucketCommands::Normalize => {
            let buckets = service.normalize()?;
            println!("Normalized {} active buckets:", buckets.len());
            for bucket in &buckets {
                println!("  {:<20} {:>8}", bucket.name, format_percentage(bucket.percent));
            }
        }

        BucketCommands::Deactivate { bucket } => {
            let found = service.resolve(&bucket)?;
            let updated = service.set_active(found.id, false)?;
            println!("Deactivated bucket: {}", updated.name);
        }

        BucketCommands::Activate { bucket } => {
            let found = service.resolve(&bucket)?;
            let updated = service.set_active(found.id, true)?;
            println!("Activated bucket: {}", updated.name);
        }

        BucketCommands::Delete { bucket, force } => {
            let found = service.resolve(&bucket)?;
            let deleted = service.delete(found.id, force)?;
            println!("Deleted bucket: {}", deleted.name);

            if settings
                .attack_bucket
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(&deleted.name))
            {
                eprintln!(
                    "Note: '{}' was the attack bucket; run 'cashplan config set attack_bucket <name>'",
                    deleted.name
                );
            }
        }
    }

    Ok(())
}

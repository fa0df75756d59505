//! Plan CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_attack_plan, format_readiness};
use crate::error::{CashplanError, CashplanResult};
use crate::services::PlanService;
use crate::storage::{PlanDocument, Storage};

use super::goal::strategy_or_default;
use super::parse_amount;

/// Plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// Ranked goals with attack readiness and payoff efficiency
    Attack {
        /// Ranking strategy (avalanche, snowball, custom)
        #[arg(short, long)]
        strategy: Option<String>,
        /// Attack bucket name (defaults to the configured one)
        #[arg(short, long)]
        bucket: Option<String>,
        /// Proposed monthly contribution for payoff efficiency
        #[arg(short, long)]
        contribution: Option<String>,
    },
    /// Whether the attack bucket can clear the top goal right now
    Ready {
        /// Ranking strategy (avalanche, snowball, custom)
        #[arg(short, long)]
        strategy: Option<String>,
        /// Attack bucket name (defaults to the configured one)
        #[arg(short, long)]
        bucket: Option<String>,
    },
    /// Write buckets and goals to a plan file (.json, .yaml)
    Export {
        file: PathBuf,
    },
    /// Create buckets and goals from a plan file (.json, .yaml)
    Import {
        file: PathBuf,
    },
}

/// Handle a plan command
pub fn handle_plan_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PlanCommands,
) -> CashplanResult<()> {
    let service = PlanService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PlanCommands::Attack {
            strategy,
            bucket,
            contribution,
        } => {
            let strategy = strategy_or_default(strategy.as_deref(), settings)?;
            let contribution = contribution
                .map(|c| parse_amount("contribution", &c))
                .transpose()?;
            let bucket = bucket.or_else(|| settings.attack_bucket.clone());

            let plan = service.attack_plan(strategy, bucket.as_deref(), contribution)?;
            print!("{}", format_attack_plan(&plan, symbol));
        }

        PlanCommands::Ready { strategy, bucket } => {
            let strategy = strategy_or_default(strategy.as_deref(), settings)?;
            let bucket = bucket
                .or_else(|| settings.attack_bucket.clone())
                .ok_or_else(|| {
                    CashplanError::Config(
                        "no attack bucket configured; pass --bucket or run 'cashplan config set attack_bucket <name>'"
                            .into(),
                    )
                })?;

            let plan = service.attack_plan(strategy, Some(&bucket), None)?;
            if let Some(readiness) = &plan.readiness {
                print!("{}", format_readiness(readiness, &bucket, symbol));
            }
        }

        PlanCommands::Export { file } => {
            let document = service.export_document()?;
            document.save(&file)?;
            println!(
                "Exported {} buckets and {} goals to {}",
                document.buckets.len(),
                document.goals.len(),
                file.display()
            );
        }

        PlanCommands::Import { file } => {
            let document = PlanDocument::load(&file)?;
            let summary = service.import_document(&document)?;
            println!(
                "Imported {} buckets and {} goals from {}",
                summary.buckets,
                summary.goals,
                file.display()
            );
        }
    }

    Ok(())
}

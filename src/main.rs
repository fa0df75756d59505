use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cashplan::cli::{
    handle_bucket_command, handle_config_command, handle_goal_command, handle_income_command,
    handle_ledger_command, handle_plan_command, handle_summary_command,
};
use cashplan::config::{paths::CashplanPaths, settings::Settings};
use cashplan::services::PlanService;
use cashplan::storage::{PlanDocument, Storage};

#[derive(Parser)]
#[command(
    name = "cashplan",
    version,
    about = "Split income across weighted buckets and rank payoff goals",
    long_about = "cashplan splits each income event across percentage-weighted buckets, \
                  ranks debts and savings goals by strategy, and tells you when the \
                  attack bucket holds enough to clear the top goal."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init {
        /// Seed buckets and goals from a plan file (.json, .yaml)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<cashplan::cli::ConfigCommands>,
    },

    /// Bucket management commands
    #[command(subcommand)]
    Bucket(cashplan::cli::BucketCommands),

    /// Goal management commands
    #[command(subcommand)]
    Goal(cashplan::cli::GoalCommands),

    /// Split income across buckets
    #[command(subcommand)]
    Income(cashplan::cli::IncomeCommands),

    /// Record bucket movements and view the ledger
    #[command(subcommand)]
    Ledger(cashplan::cli::LedgerCommands),

    /// Attack plan, readiness and plan files
    #[command(subcommand)]
    Plan(cashplan::cli::PlanCommands),

    /// Balances, monthly flow and goal counts at a glance
    Summary {
        /// Any day of the month to report (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CASHPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = CashplanPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init { from }) => {
            println!("Initializing cashplan at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;

            if let Some(file) = from {
                let document = PlanDocument::load(&file)?;
                let summary = PlanService::new(&storage).import_document(&document)?;
                println!(
                    "Seeded {} buckets and {} goals from {}",
                    summary.buckets,
                    summary.goals,
                    file.display()
                );
            }

            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  cashplan bucket create Operations 60");
            println!("  cashplan goal create \"Car loan\" 4800 --relief 350");
            println!("  cashplan income split 1000");
        }
        Some(Commands::Config { command }) => {
            handle_config_command(&storage, &mut settings, command)?;
        }
        Some(Commands::Bucket(cmd)) => {
            handle_bucket_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Income(cmd)) => {
            handle_income_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Ledger(cmd)) => {
            handle_ledger_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Plan(cmd)) => {
            handle_plan_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Summary { date }) => {
            handle_summary_command(&storage, &settings, date)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("cashplan - split income, rank goals, attack debt");
            println!();
            println!("Run 'cashplan --help' for usage information.");
            if !paths.is_initialized() {
                println!("Run 'cashplan init' to get started.");
            }
        }
    }

    Ok(())
}

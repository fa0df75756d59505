//! Goal CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_goal_details, format_goal_list};
use crate::engine::Strategy;
use crate::error::{CashplanError, CashplanResult};
use crate::models::GoalKind;
use crate::services::{GoalService, GoalUpdate, NewGoal};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a new goal
    Create {
        /// Goal name
        name: String,
        /// Amount needed to clear the goal (e.g., "4800.00")
        cost: String,
        /// Goal kind (debt, savings)
        #[arg(short, long, default_value = "debt")]
        kind: String,
        /// Monthly burden removed once cleared
        #[arg(short, long)]
        relief: Option<String>,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: Option<f64>,
        /// Priority weight for the custom strategy
        #[arg(short, long)]
        weight: Option<f64>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List goals in ranked order
    List {
        /// Include cleared goals
        #[arg(short, long)]
        all: bool,
        /// Ranking strategy (avalanche, snowball, custom)
        #[arg(short, long)]
        strategy: Option<String>,
    },
    /// Show goal details and payment history
    Show {
        /// Goal name or ID
        goal: String,
    },
    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        cost: Option<String>,
        #[arg(short, long)]
        relief: Option<String>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record a payment toward a goal
    Pay {
        /// Goal name or ID
        goal: String,
        /// Payment amount
        amount: String,
        /// Payment date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Reopen a cleared goal
    Reopen {
        /// Goal name or ID
        goal: String,
    },
    /// Delete a goal and its payments
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Resolve a strategy argument, falling back to the configured default
pub(crate) fn strategy_or_default(
    strategy: Option<&str>,
    settings: &Settings,
) -> CashplanResult<Strategy> {
    match strategy {
        Some(s) => s.parse(),
        None => Ok(settings.default_strategy),
    }
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> CashplanResult<()> {
    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Create {
            name,
            cost,
            kind,
            relief,
            rate,
            weight,
            notes,
        } => {
            let kind = GoalKind::parse(&kind).ok_or_else(|| {
                CashplanError::Validation(format!(
                    "Invalid goal kind: '{}'. Valid kinds: debt, savings",
                    kind
                ))
            })?;

            let mut new = NewGoal::new(name, kind, parse_amount("cost", &cost)?);
            if let Some(relief) = relief {
                new.monthly_relief = parse_amount("relief", &relief)?;
            }
            new.annual_rate = rate;
            new.priority_weight = weight.unwrap_or(0.0);
            new.notes = notes;

            let goal = service.create(new)?;
            println!("Created goal: {}", goal.name);
            println!("  Kind: {}", goal.kind);
            println!("  Cost: {}", goal.cost.format_with_symbol(symbol));
            println!(
                "  Monthly relief: {}",
                goal.monthly_relief.format_with_symbol(symbol)
            );
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List { all, strategy } => {
            let strategy = strategy_or_default(strategy.as_deref(), settings)?;
            let goals = service.list(all)?;
            let ranked = service.ranked(strategy)?;

            // Ranked open goals first, then cleared ones in creation order
            let mut ordered = Vec::with_capacity(goals.len());
            for entry in &ranked {
                if let Some(goal) = goals.iter().find(|g| g.id == entry.goal_id) {
                    ordered.push(service.summary(goal)?);
                }
            }
            for goal in goals.iter().filter(|g| !g.is_active()) {
                ordered.push(service.summary(goal)?);
            }

            println!("Strategy: {}", strategy);
            print!("{}", format_goal_list(&ordered, symbol));
        }

        GoalCommands::Show { goal } => {
            let found = service.resolve(&goal)?;
            let summary = service.summary(&found)?;
            let payments = service.payments(found.id)?;
            print!("{}", format_goal_details(&summary, &payments, symbol));
        }

        GoalCommands::Edit {
            goal,
            name,
            cost,
            relief,
            rate,
            weight,
            notes,
        } => {
            let found = service.resolve(&goal)?;
            let update = GoalUpdate {
                name,
                cost: cost.map(|c| parse_amount("cost", &c)).transpose()?,
                monthly_relief: relief.map(|r| parse_amount("relief", &r)).transpose()?,
                annual_rate: rate,
                priority_weight: weight,
                notes,
            };

            if update.name.is_none()
                && update.cost.is_none()
                && update.monthly_relief.is_none()
                && update.annual_rate.is_none()
                && update.priority_weight.is_none()
                && update.notes.is_none()
            {
                println!("No changes specified. Use --name, --cost, --relief, --rate, --weight or --notes.");
                return Ok(());
            }

            let updated = service.update(found.id, update)?;
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Pay {
            goal,
            amount,
            date,
            note,
        } => {
            let found = service.resolve(&goal)?;
            let amount = parse_amount("amount", &amount)?;
            let date = parse_date(date.as_deref())?;

            let (payment, goal) = service.record_payment(found.id, amount, date, &note)?;
            let summary = service.summary(&goal)?;

            println!(
                "Recorded payment of {} toward {}",
                payment.amount.format_with_symbol(symbol),
                goal.name
            );
            println!(
                "  Remaining: {}",
                summary.remaining.format_with_symbol(symbol)
            );
            if !goal.is_active() {
                println!("  Goal cleared!");
            }
        }

        GoalCommands::Reopen { goal } => {
            let found = service.resolve(&goal)?;
            let reopened = service.reopen(found.id)?;
            println!("Reopened goal: {}", reopened.name);
        }

        GoalCommands::Delete { goal } => {
            let found = service.resolve(&goal)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}

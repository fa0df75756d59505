//! Goal display formatting

use crate::engine::{AttackReadiness, Strategy};
use crate::models::GoalPayment;
use crate::services::{AttackPlan, GoalSummary};

use super::report::{column_width, format_bar, format_percentage, money, separator, truncate};

/// Format goal summaries as a table
pub fn format_goal_list(summaries: &[GoalSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No goals found.".to_string();
    }

    let name_width = column_width("Name", summaries.iter().map(|s| s.goal.name.as_str()));

    let mut output = format!(
        "{:<name_width$}  {:<7}  {:>12}  {:>12}  {:>12}  {:<12}  {}\n",
        "Name", "Kind", "Cost", "Relief/mo", "Remaining", "Progress", "Status",
    );
    output.push_str(&separator(name_width + 82));
    output.push('\n');

    for summary in summaries {
        let goal = &summary.goal;
        output.push_str(&format!(
            "{:<name_width$}  {:<7}  {:>12}  {:>12}  {:>12}  {:<12}  {}\n",
            goal.name,
            goal.kind.to_string(),
            money(goal.cost, symbol),
            money(goal.monthly_relief, symbol),
            money(summary.remaining, symbol),
            format_bar(summary.progress_percent, 100.0, 12),
            goal.status,
        ));
    }

    output
}

/// Format a single goal with payment history
pub fn format_goal_details(summary: &GoalSummary, payments: &[GoalPayment], symbol: &str) -> String {
    let goal = &summary.goal;
    let mut output = String::new();

    output.push_str(&format!("Goal: {}\n", goal.name));
    output.push_str(&format!("  ID:             {}\n", goal.id));
    output.push_str(&format!("  Kind:           {}\n", goal.kind));
    output.push_str(&format!("  Status:         {}\n", goal.status));
    output.push_str(&format!("  Cost:           {}\n", money(goal.cost, symbol)));
    output.push_str(&format!(
        "  Monthly relief: {}\n",
        money(goal.monthly_relief, symbol)
    ));
    if let Some(rate) = goal.annual_rate {
        output.push_str(&format!("  Annual rate:    {}\n", format_percentage(rate)));
    }
    output.push_str(&format!("  Weight:         {}\n", goal.priority_weight));
    output.push_str(&format!("  Paid:           {}\n", money(summary.paid, symbol)));
    output.push_str(&format!("  Remaining:      {}\n", money(summary.remaining, symbol)));
    output.push_str(&format!(
        "  Progress:       {} {}\n",
        format_bar(summary.progress_percent, 100.0, 20),
        format_percentage(summary.progress_percent)
    ));
    if !goal.notes.is_empty() {
        output.push_str(&format!("  Notes:          {}\n", goal.notes));
    }

    if payments.is_empty() {
        output.push_str("\nNo payments recorded.\n");
    } else {
        output.push_str(&format!("\nPayments ({}):\n", payments.len()));
        for payment in payments {
            output.push_str(&format!(
                "  {}  {:>12}  {}\n",
                payment.date.format("%Y-%m-%d"),
                money(payment.amount, symbol),
                truncate(&payment.note, 40),
            ));
        }
    }

    output
}

/// Format a readiness verdict in one or two lines
pub fn format_readiness(readiness: &AttackReadiness, bucket: &str, symbol: &str) -> String {
    let Some(goal) = &readiness.goal_name else {
        return format!(
            "Attack bucket '{}' holds {}; no open goals to attack.\n",
            bucket,
            money(readiness.balance, symbol)
        );
    };

    let mut output = format!(
        "Attack bucket '{}': {} of {} for '{}'\n",
        bucket,
        money(readiness.balance, symbol),
        money(readiness.cost, symbol),
        goal
    );
    if readiness.ready {
        output.push_str("READY: the top goal can be cleared now.\n");
    } else {
        output.push_str(&format!(
            "Not ready: {} short.\n",
            money(readiness.shortfall(), symbol)
        ));
    }
    output
}

fn strategy_note(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Avalanche => "highest monthly relief per unit of cost first",
        Strategy::Snowball => "smallest cost first",
        Strategy::Custom => "highest priority weight first",
    }
}

/// Format the attack plan report
pub fn format_attack_plan(plan: &AttackPlan, symbol: &str) -> String {
    let mut output = format!(
        "Attack plan ({}: {})\n",
        plan.strategy,
        strategy_note(plan.strategy)
    );

    if plan.lines.is_empty() {
        output.push_str("No open goals.\n");
    } else {
        let name_width = column_width("Goal", plan.lines.iter().map(|l| l.goal.name.as_str()));
        let with_efficiency = plan.contribution.is_some();

        output.push_str(&format!(
            "{:>3}  {:<name_width$}  {:>10}  {:>12}  {:>12}",
            "#", "Goal", "Score", "Cost", "Paid",
        ));
        if with_efficiency {
            output.push_str(&format!("  {:>8}  {:>9}", "Months", "Per 1000"));
        }
        output.push('\n');
        output.push_str(&separator(name_width + if with_efficiency { 76 } else { 55 }));
        output.push('\n');

        for line in &plan.lines {
            output.push_str(&format!(
                "{:>3}  {:<name_width$}  {:>10.4}  {:>12}  {:>12}",
                line.rank,
                line.goal.name,
                line.goal.score,
                money(line.goal.cost, symbol),
                money(line.paid, symbol),
            ));
            if let Some(efficiency) = &line.efficiency {
                let months = efficiency
                    .months_to_clear
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "-".into());
                let per_unit = efficiency
                    .per_unit
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_else(|| "-".into());
                output.push_str(&format!("  {:>8}  {:>9}", months, per_unit));
            }
            output.push('\n');
        }

        if let Some(contribution) = plan.contribution {
            output.push_str(&format!(
                "Months assume {} per month.\n",
                money(contribution, symbol)
            ));
        }
    }

    match (&plan.readiness, &plan.attack_bucket) {
        (Some(readiness), Some(bucket)) => {
            output.push('\n');
            output.push_str(&format_readiness(readiness, bucket, symbol));
        }
        _ => output.push_str("\nNo attack bucket configured (cashplan config set attack_bucket <name>).\n"),
    }

    output
}

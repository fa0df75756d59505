//! Summary display formatting

use crate::services::PlanSummary;

use super::report::{money, separator};

/// Format the plan summary as a labelled block
pub fn format_summary(summary: &PlanSummary, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str("Plan summary\n");
    output.push_str(&separator(44));
    output.push('\n');

    let mut line = |label: &str, value: String| {
        output.push_str(&format!("{:<28}{:>16}\n", label, value));
    };

    line(
        &format!("Balance ({} buckets)", summary.bucket_count),
        money(summary.total_balance, symbol),
    );
    line(
        &format!("Income {}", summary.month_start.format("%Y-%m")),
        money(summary.month.income, symbol),
    );
    line(
        &format!("Outflow {}", summary.month_start.format("%Y-%m")),
        money(summary.month.outflow, symbol),
    );
    line("Income (all time)", money(summary.all_time.income, symbol));
    line("Outflow (all time)", money(summary.all_time.outflow, symbol));
    line(
        "Active goals",
        format!("{} ({} cleared)", summary.active_goals, summary.cleared_goals),
    );
    line("Declared income/mo", money(summary.declared_income, symbol));
    line("Declared expense/mo", money(summary.declared_expense, symbol));
    line("Declared margin/mo", money(summary.declared_margin(), symbol));

    output
}

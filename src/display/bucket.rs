//! Bucket and income split display formatting

use crate::engine::Allocation;
use crate::models::{Bucket, LedgerEntry};

use super::report::{column_width, format_percentage, money, separator};

/// Format buckets as a table with the percent sum underneath
pub fn format_bucket_list(buckets: &[Bucket], symbol: &str) -> String {
    if buckets.is_empty() {
        return "No buckets found.".to_string();
    }

    let name_width = column_width("Name", buckets.iter().map(|b| b.name.as_str()));
    let kind_width = column_width("Kind", buckets.iter().map(|b| b.kind.as_str()));

    let mut output = format!(
        "{:<name_width$}  {:<kind_width$}  {:>9}  {:>12}  {}\n",
        "Name", "Kind", "Percent", "Balance", "Flags",
    );
    output.push_str(&separator(name_width + kind_width + 38));
    output.push('\n');

    for bucket in buckets {
        let mut flags = Vec::new();
        if bucket.priority_pre {
            flags.push("skim");
        }
        if !bucket.active {
            flags.push("inactive");
        }

        output.push_str(&format!(
            "{:<name_width$}  {:<kind_width$}  {:>9}  {:>12}  {}\n",
            bucket.name,
            bucket.kind,
            format_percentage(bucket.percent),
            money(bucket.balance, symbol),
            flags.join(", "),
        ));
    }

    let active_sum: f64 = buckets.iter().filter(|b| b.active).map(|b| b.percent).sum();
    output.push_str(&separator(name_width + kind_width + 38));
    output.push('\n');
    output.push_str(&format!(
        "Active percent sum: {}",
        format_percentage(active_sum)
    ));
    if (active_sum - 100.0).abs() > 0.01 {
        output.push_str("  (normalized when splitting)");
    }
    output.push('\n');

    output
}

/// Format a single bucket's details
pub fn format_bucket_details(bucket: &Bucket, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bucket: {}\n", bucket.name));
    output.push_str(&format!("  ID:          {}\n", bucket.id));
    output.push_str(&format!("  Kind:        {}\n", bucket.kind));
    output.push_str(&format!("  Percent:     {}\n", format_percentage(bucket.percent)));
    output.push_str(&format!(
        "  Skim first:  {}\n",
        if bucket.priority_pre { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Active:      {}\n",
        if bucket.active { "Yes" } else { "No" }
    ));
    output.push_str(&format!("  Balance:     {}\n", money(bucket.balance, symbol)));
    if !bucket.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", bucket.description));
    }
    output.push_str(&format!(
        "  Created:     {}\n",
        bucket.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Format an income split, one line per bucket
pub fn format_allocation(allocation: &Allocation, symbol: &str) -> String {
    let mut output = format!(
        "Split of {} ({})\n",
        money(allocation.total, symbol),
        allocation.policy
    );

    if allocation.shares.is_empty() {
        output.push_str("No active buckets.\n");
    } else {
        let name_width =
            column_width("Bucket", allocation.shares.iter().map(|s| s.bucket_name.as_str()));
        output.push_str(&format!(
            "{:<name_width$}  {:>9}  {:>12}\n",
            "Bucket", "Percent", "Amount",
        ));
        output.push_str(&separator(name_width + 25));
        output.push('\n');

        for share in &allocation.shares {
            output.push_str(&format!(
                "{:<name_width$}  {:>9}  {:>12}\n",
                share.bucket_name,
                format_percentage(share.effective_percent),
                money(share.amount, symbol),
            ));
        }

        output.push_str(&separator(name_width + 25));
        output.push('\n');
        output.push_str(&format!(
            "{:<name_width$}  {:>9}  {:>12}\n",
            "Allocated",
            "",
            money(allocation.allocated(), symbol),
        ));
    }

    if allocation.has_unallocated() {
        output.push_str(&format!(
            "Unallocated: {}\n",
            money(allocation.unallocated, symbol)
        ));
    }
    if !allocation.drift().is_zero() {
        output.push_str(&format!(
            "Rounding drift: {}\n",
            money(allocation.drift(), symbol)
        ));
    }

    output
}

/// Format ledger entries in the order given
pub fn format_ledger(entries: &[LedgerEntry], buckets: &[Bucket], symbol: &str) -> String {
    if entries.is_empty() {
        return "No ledger entries.".to_string();
    }

    let bucket_name = |entry: &LedgerEntry| -> String {
        entry
            .bucket_id
            .and_then(|id| buckets.iter().find(|b| b.id == id))
            .map(|b| b.name.clone())
            .unwrap_or_else(|| "(deleted)".to_string())
    };
    let names: Vec<String> = entries.iter().map(bucket_name).collect();
    let name_width = column_width("Bucket", names.iter().map(String::as_str));

    let mut output = format!(
        "{:<10}  {:<name_width$}  {:<8}  {:>12}  {}\n",
        "Date", "Bucket", "Kind", "Amount", "Description",
    );
    output.push_str(&separator(name_width + 50));
    output.push('\n');

    for (entry, name) in entries.iter().zip(&names) {
        output.push_str(&format!(
            "{:<10}  {:<name_width$}  {:<8}  {:>12}  {}\n",
            entry.date.format("%Y-%m-%d").to_string(),
            name,
            entry.kind.to_string(),
            money(entry.balance_delta(), symbol),
            entry.description,
        ));
    }

    output
}

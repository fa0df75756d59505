//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod bucket;
pub mod config;
pub mod goal;
pub mod income;
pub mod ledger;
pub mod plan;
pub mod summary;

pub use bucket::{handle_bucket_command, BucketCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use plan::{handle_plan_command, PlanCommands};
pub use summary::handle_summary_command;

use chrono::NaiveDate;

use crate::error::{CashplanError, CashplanResult};
use crate::models::Money;

/// Parse a user-entered amount such as "1200", "1,200.50" or "$45"
pub(crate) fn parse_amount(field: &str, input: &str) -> CashplanResult<Money> {
    Money::parse(input).map_err(|e| {
        CashplanError::Validation(format!(
            "Invalid {} '{}'. Use a format like '1000.00' or '1000'. Error: {}",
            field, input, e
        ))
    })
}

/// Parse an optional YYYY-MM-DD date, defaulting to today
pub(crate) fn parse_date(input: Option<&str>) -> CashplanResult<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
            CashplanError::Validation(format!(
                "Invalid date '{}'. Use YYYY-MM-DD. Error: {}",
                s, e
            ))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "1,200.50").unwrap().cents(), 120050);
        assert!(parse_amount("amount", "twelve").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date(Some("2025-03-09")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert!(parse_date(Some("09/03/2025")).is_err());
        assert!(parse_date(None).is_ok());
    }
}

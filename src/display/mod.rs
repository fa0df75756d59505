//! Display formatting for terminal output
//!
//! Turns records, splits and reports into plain-text tables. Amounts are
//! printed with the currency symbol from settings.

pub mod bucket;
pub mod goal;
pub mod report;
pub mod summary;

pub use bucket::{format_allocation, format_bucket_details, format_bucket_list, format_ledger};
pub use goal::{format_attack_plan, format_goal_details, format_goal_list, format_readiness};
pub use summary::format_summary;

//! Service layer for cashplan
//!
//! Business logic on top of the storage layer: validation, calls into the
//! engine, and persisting plus auditing the results.

pub mod bucket;
pub mod goal;
pub mod income;
pub mod ledger;
pub mod plan;
pub mod summary;

pub use bucket::{BucketService, BucketUpdate, NewBucket};
pub use goal::{GoalService, GoalSummary, GoalUpdate, NewGoal};
pub use income::{AppliedSplit, IncomeService};
pub use ledger::LedgerService;
pub use plan::{AttackPlan, ImportSummary, PlanLine, PlanService};
pub use summary::{Flow, PlanSummary, SummaryService};

//! Allocation and prioritization engine
//!
//! Pure functions over caller-supplied records. Nothing here reads or writes
//! storage; callers persist the results.
//!
//! - `allocator`: split income across buckets (`normalize_percentages`,
//!   `split_by_buckets`)
//! - `ranking`: score and order goals by strategy (`score_goals`, `rank_goals`)
//! - `readiness`: compare the attack bucket against the top goal
//! - `efficiency`: months to clear a goal for a monthly contribution

pub mod allocator;
pub mod efficiency;
pub mod ranking;
pub mod readiness;

pub use allocator::{
    normalize_percentages, split_by_buckets, Allocation, BucketShare, ResidualPolicy,
    SplitOptions, SplitPolicy,
};
pub use efficiency::{payoff_efficiency, PayoffEfficiency, PayoffInput, EFFICIENCY_UNIT};
pub use ranking::{rank_goals, score_goals, GoalScore, RankedGoal, Strategy};
pub use readiness::{attack_readiness, attack_readiness_for, AttackReadiness};

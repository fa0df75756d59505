//! Attack readiness
//!
//! Compares the balance of the attack bucket (the bucket earmarked to fund
//! goals) against the cost of the top-ranked goal.

use serde::Serialize;
use tracing::warn;

use crate::models::{Bucket, Goal, GoalId, Money};

use super::ranking::{rank_goals, RankedGoal, Strategy};

/// Whether the attack bucket can clear the top-ranked goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackReadiness {
    /// Top-ranked goal, `None` when there is no target
    pub goal_id: Option<GoalId>,
    pub goal_name: Option<String>,
    /// Attack bucket balance; zero when the bucket does not exist
    pub balance: Money,
    /// Cost of the top-ranked goal; zero when there is no target
    pub cost: Money,
    /// `balance >= cost` with a positive cost
    pub ready: bool,
}

impl AttackReadiness {
    /// True when there is a goal to attack
    pub fn has_target(&self) -> bool {
        self.goal_id.is_some()
    }

    /// How much more the attack bucket needs before it is ready
    pub fn shortfall(&self) -> Money {
        (self.cost - self.balance).clamp_zero()
    }
}

/// Readiness against an already-ranked goal list
///
/// A `None` balance means the attack bucket could not be found; it is
/// reported as zero.
pub fn attack_readiness(ranked: &[RankedGoal], balance: Option<Money>) -> AttackReadiness {
    let balance = balance.unwrap_or_default();

    match ranked.first() {
        Some(top) => AttackReadiness {
            goal_id: Some(top.goal_id),
            goal_name: Some(top.name.clone()),
            balance,
            cost: top.cost,
            // A zero cost never reads as satisfied
            ready: top.cost.is_positive() && balance >= top.cost,
        },
        None => AttackReadiness {
            goal_id: None,
            goal_name: None,
            balance,
            cost: Money::zero(),
            ready: false,
        },
    }
}

/// Rank `goals` (avalanche unless a strategy is given) and check readiness
/// against the bucket named `attack_bucket` (case-insensitive)
pub fn attack_readiness_for(
    goals: &[Goal],
    strategy: Option<Strategy>,
    buckets: &[Bucket],
    attack_bucket: &str,
) -> AttackReadiness {
    let ranked = rank_goals(goals, strategy.unwrap_or_default());

    let wanted = attack_bucket.to_lowercase();
    let balance = buckets
        .iter()
        .find(|b| b.name.to_lowercase() == wanted)
        .map(|b| b.balance);

    if balance.is_none() {
        warn!(bucket = attack_bucket, "attack bucket not found, balance reported as zero");
    }

    attack_readiness(&ranked, balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals() -> Vec<Goal> {
        vec![
            Goal::debt("Card", Money::from_cents(100000), Money::from_cents(10000)),
            Goal::debt("Loan", Money::from_cents(50000), Money::from_cents(10000)),
        ]
    }

    fn attack_bucket(balance: i64) -> Bucket {
        let mut bucket = Bucket::new("Attack", 20.0);
        bucket.apply_delta(Money::from_cents(balance)).unwrap();
        bucket
    }

    #[test]
    fn test_no_goals_is_no_target() {
        let readiness = attack_readiness(&[], Some(Money::from_cents(1000)));
        assert_eq!(readiness.goal_name, None);
        assert!(!readiness.ready);
        assert!(!readiness.has_target());
        assert_eq!(readiness.balance.cents(), 1000);
        assert!(readiness.cost.is_zero());
    }

    #[test]
    fn test_ready_when_balance_covers_top_goal() {
        let ranked = rank_goals(&goals(), Strategy::Avalanche);

        let readiness = attack_readiness(&ranked, Some(Money::from_cents(50000)));
        assert_eq!(readiness.goal_name.as_deref(), Some("Loan"));
        assert_eq!(readiness.cost.cents(), 50000);
        assert!(readiness.ready);
        assert!(readiness.shortfall().is_zero());
    }

    #[test]
    fn test_not_ready_reports_shortfall() {
        let ranked = rank_goals(&goals(), Strategy::Avalanche);

        let readiness = attack_readiness(&ranked, Some(Money::from_cents(20000)));
        assert!(!readiness.ready);
        assert_eq!(readiness.shortfall().cents(), 30000);
    }

    #[test]
    fn test_zero_cost_never_ready() {
        let free = vec![Goal::savings("Unset", Money::zero())];
        let ranked = rank_goals(&free, Strategy::Snowball);

        let readiness = attack_readiness(&ranked, Some(Money::from_cents(100)));
        assert_eq!(readiness.goal_name.as_deref(), Some("Unset"));
        assert!(!readiness.ready);
    }

    #[test]
    fn test_missing_bucket_reports_zero_balance() {
        let readiness = attack_readiness_for(&goals(), None, &[], "Attack");
        assert!(readiness.balance.is_zero());
        assert_eq!(readiness.cost.cents(), 50000);
        assert!(!readiness.ready);
    }

    #[test]
    fn test_readiness_for_finds_bucket_by_name() {
        let buckets = vec![Bucket::new("Operations", 80.0), attack_bucket(120000)];

        let readiness =
            attack_readiness_for(&goals(), Some(Strategy::Snowball), &buckets, "attack");
        assert_eq!(readiness.goal_name.as_deref(), Some("Loan"));
        assert_eq!(readiness.balance.cents(), 120000);
        assert!(readiness.ready);

        // Custom with equal weights keeps input order, so the card is on top
        let readiness =
            attack_readiness_for(&goals(), Some(Strategy::Custom), &buckets, "Attack");
        assert_eq!(readiness.goal_name.as_deref(), Some("Card"));
        assert!(readiness.ready);
    }
}

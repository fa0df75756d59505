//! Plan service
//!
//! The attack plan report (ranking, readiness and payoff efficiency in one
//! view) and import/export of plan documents.

use crate::audit::{AuditEntry, EntityType};
use crate::engine::{
    attack_readiness_for, payoff_efficiency, rank_goals, AttackReadiness, PayoffEfficiency,
    PayoffInput, RankedGoal, Strategy,
};
use crate::error::{CashplanError, CashplanResult};
use crate::models::Money;
use crate::storage::{PlanDocument, Storage};

/// Service for plan reports and plan documents
pub struct PlanService<'a> {
    storage: &'a Storage,
}

/// One ranked goal in the attack plan
#[derive(Debug, Clone)]
pub struct PlanLine {
    pub rank: usize,
    pub goal: RankedGoal,
    pub paid: Money,
    /// Present when a contribution was proposed
    pub efficiency: Option<PayoffEfficiency>,
}

/// Ranked goals plus readiness of the attack bucket
#[derive(Debug, Clone)]
pub struct AttackPlan {
    pub strategy: Strategy,
    pub lines: Vec<PlanLine>,
    /// Name of the attack bucket consulted, if one is configured
    pub attack_bucket: Option<String>,
    /// `None` when no attack bucket is configured
    pub readiness: Option<AttackReadiness>,
    pub contribution: Option<Money>,
}

/// Counts of records created by an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub buckets: usize,
    pub goals: usize,
}

impl<'a> PlanService<'a> {
    /// Create a new plan service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Build the attack plan for the open goals
    ///
    /// `contribution` is the proposed monthly amount used for payoff
    /// efficiency; without it the efficiency column is left empty.
    pub fn attack_plan(
        &self,
        strategy: Strategy,
        attack_bucket: Option<&str>,
        contribution: Option<Money>,
    ) -> CashplanResult<AttackPlan> {
        let goals = self.storage.goals.get_active()?;
        let ranked = rank_goals(&goals, strategy);

        let mut lines = Vec::with_capacity(ranked.len());
        for (i, goal) in ranked.iter().enumerate() {
            let paid = self.storage.goals.total_paid(goal.goal_id)?;
            let efficiency = contribution
                .map(|c| payoff_efficiency(&PayoffInput::new(goal.cost, paid), c));
            lines.push(PlanLine {
                rank: i + 1,
                goal: goal.clone(),
                paid,
                efficiency,
            });
        }

        let readiness = match attack_bucket {
            Some(name) => {
                let buckets = self.storage.buckets.get_all()?;
                Some(attack_readiness_for(&goals, Some(strategy), &buckets, name))
            }
            None => None,
        };

        Ok(AttackPlan {
            strategy,
            lines,
            attack_bucket: attack_bucket.map(str::to_string),
            readiness,
            contribution,
        })
    }

    /// Create the buckets and goals listed in a plan document
    ///
    /// Nothing is written when any entry is invalid or collides with an
    /// existing name.
    pub fn import_document(&self, document: &PlanDocument) -> CashplanResult<ImportSummary> {
        let (buckets, goals) = document.to_records()?;

        for bucket in &buckets {
            if self.storage.buckets.name_exists(&bucket.name, None)? {
                return Err(CashplanError::Duplicate {
                    entity_type: "Bucket",
                    identifier: bucket.name.clone(),
                });
            }
        }
        for goal in &goals {
            if self.storage.goals.name_exists(&goal.name, None)? {
                return Err(CashplanError::Duplicate {
                    entity_type: "Goal",
                    identifier: goal.name.clone(),
                });
            }
        }

        let mut audit = Vec::with_capacity(buckets.len() + goals.len());
        for bucket in &buckets {
            audit.push(AuditEntry::create(
                EntityType::Bucket,
                bucket.id.to_string(),
                Some(bucket.name.clone()),
                bucket,
            ));
            self.storage.buckets.upsert(bucket.clone())?;
        }
        for goal in &goals {
            audit.push(AuditEntry::create(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.name.clone()),
                goal,
            ));
            self.storage.goals.upsert(goal.clone())?;
        }

        self.storage.buckets.save()?;
        self.storage.goals.save()?;
        self.storage.log_batch(&audit)?;

        Ok(ImportSummary {
            buckets: buckets.len(),
            goals: goals.len(),
        })
    }

    /// The current buckets and goals as a plan document
    pub fn export_document(&self) -> CashplanResult<PlanDocument> {
        let buckets = self.storage.buckets.get_all()?;
        let goals = self.storage.goals.get_all()?;
        Ok(PlanDocument::from_records(&buckets, &goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashplanPaths;
    use crate::models::{Bucket, Goal, GoalPayment};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashplanPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed_goals(storage: &Storage) -> Vec<Goal> {
        let goals = vec![
            Goal::debt("Card X", Money::from_cents(100000), Money::from_cents(10000)),
            Goal::debt("Loan Y", Money::from_cents(50000), Money::from_cents(10000)),
        ];
        for goal in &goals {
            storage.goals.upsert(goal.clone()).unwrap();
        }
        goals
    }

    fn seed_attack_bucket(storage: &Storage, balance: i64) {
        let mut bucket = Bucket::new("Attack", 40.0);
        bucket.apply_delta(Money::from_cents(balance)).unwrap();
        storage.buckets.upsert(bucket).unwrap();
    }

    #[test]
    fn test_attack_plan_ranks_and_checks_readiness() {
        let (_temp_dir, storage) = create_test_storage();
        seed_goals(&storage);
        seed_attack_bucket(&storage, 60000);
        let service = PlanService::new(&storage);

        let plan = service
            .attack_plan(Strategy::Avalanche, Some("attack"), None)
            .unwrap();

        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].rank, 1);
        assert_eq!(plan.lines[0].goal.name, "Loan Y");
        assert!(plan.lines[0].efficiency.is_none());

        let readiness = plan.readiness.unwrap();
        assert!(readiness.ready);
        assert_eq!(readiness.goal_name.as_deref(), Some("Loan Y"));
    }

    #[test]
    fn test_attack_plan_missing_bucket() {
        let (_temp_dir, storage) = create_test_storage();
        seed_goals(&storage);
        let service = PlanService::new(&storage);

        let plan = service
            .attack_plan(Strategy::Snowball, Some("Nowhere"), None)
            .unwrap();
        let readiness = plan.readiness.unwrap();
        assert!(readiness.balance.is_zero());
        assert!(!readiness.ready);

        let unconfigured = service.attack_plan(Strategy::Snowball, None, None).unwrap();
        assert!(unconfigured.readiness.is_none());
    }

    #[test]
    fn test_readiness_follows_plan_strategy() {
        let (_temp_dir, storage) = create_test_storage();
        let mut goals = seed_goals(&storage);
        goals[0].set_priority_weight(5.0);
        storage.goals.upsert(goals[0].clone()).unwrap();
        seed_attack_bucket(&storage, 60000);
        let service = PlanService::new(&storage);

        let plan = service
            .attack_plan(Strategy::Custom, Some("ATTACK"), None)
            .unwrap();

        assert_eq!(plan.lines[0].goal.name, "Card X");
        let readiness = plan.readiness.unwrap();
        assert_eq!(readiness.goal_name.as_deref(), Some("Card X"));
        assert_eq!(readiness.shortfall().cents(), 40000);
    }

    #[test]
    fn test_attack_plan_efficiency_uses_payments() {
        let (_temp_dir, storage) = create_test_storage();
        let goals = seed_goals(&storage);
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        storage
            .goals
            .add_payment(GoalPayment::new(goals[0].id, Money::from_cents(40000), date, ""))
            .unwrap();
        let service = PlanService::new(&storage);

        let plan = service
            .attack_plan(Strategy::Avalanche, None, Some(Money::from_cents(30000)))
            .unwrap();

        let card = plan.lines.iter().find(|l| l.goal.name == "Card X").unwrap();
        assert_eq!(card.paid.cents(), 40000);
        let efficiency = card.efficiency.unwrap();
        assert_eq!(efficiency.remaining.cents(), 60000);
        assert_eq!(efficiency.months_to_clear, Some(2));
        assert_eq!(efficiency.per_unit, Some(3.33));
    }

    #[test]
    fn test_import_then_export() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);
        let document: PlanDocument = serde_yaml::from_str(
            "buckets:\n  - name: Tithe\n    percent: 10\n    priority_pre: true\n  - name: Ops\n    percent: 90\ngoals:\n  - name: Card\n    cost: \"500\"\n",
        )
        .unwrap();

        let summary = service.import_document(&document).unwrap();
        assert_eq!(summary, ImportSummary { buckets: 2, goals: 1 });
        assert_eq!(storage.audit().read_all().unwrap().len(), 3);

        let exported = service.export_document().unwrap();
        assert_eq!(exported.buckets.len(), 2);
        assert!(exported.buckets[0].priority_pre);
        assert_eq!(exported.goals[0].cost, "500.00");
    }

    #[test]
    fn test_export_import_keeps_cleared_goal_out_of_ranking() {
        let (_first_dir, first) = create_test_storage();
        let mut goals = seed_goals(&first);
        goals[1].mark_cleared();
        first.goals.upsert(goals[1].clone()).unwrap();
        let mut retired = Bucket::new("Retired", 5.0);
        retired.deactivate();
        first.buckets.upsert(retired).unwrap();
        seed_attack_bucket(&first, 60000);
        let document = PlanService::new(&first).export_document().unwrap();

        let (_second_dir, second) = create_test_storage();
        let service = PlanService::new(&second);
        service.import_document(&document).unwrap();

        let retired = second.buckets.get_by_name("Retired").unwrap().unwrap();
        assert!(!retired.active);
        let plan = service
            .attack_plan(Strategy::Avalanche, Some("Attack"), None)
            .unwrap();
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].goal.name, "Card X");
        assert!(!plan.readiness.unwrap().ready);
    }

    #[test]
    fn test_import_rejects_existing_names() {
        let (_temp_dir, storage) = create_test_storage();
        seed_attack_bucket(&storage, 0);
        let service = PlanService::new(&storage);
        let document: PlanDocument =
            serde_yaml::from_str("buckets:\n  - name: attack\n    percent: 10\n").unwrap();

        assert!(matches!(
            service.import_document(&document),
            Err(CashplanError::Duplicate { .. })
        ));
        assert_eq!(storage.buckets.count().unwrap(), 1);
    }
}

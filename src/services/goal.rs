//! Goal service
//!
//! Business logic for goals: CRUD, ranking, payments and progress.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::engine::{rank_goals, RankedGoal, Strategy};
use crate::error::{CashplanError, CashplanResult};
use crate::models::{Goal, GoalId, GoalKind, GoalPayment, Money};
use crate::storage::Storage;

/// Service for goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

/// Fields for a new goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub kind: GoalKind,
    pub cost: Money,
    pub monthly_relief: Money,
    pub annual_rate: Option<f64>,
    pub priority_weight: f64,
    pub notes: Option<String>,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, kind: GoalKind, cost: Money) -> Self {
        Self {
            name: name.into(),
            kind,
            cost,
            monthly_relief: Money::zero(),
            annual_rate: None,
            priority_weight: 0.0,
            notes: None,
        }
    }
}

/// Optional edits to an existing goal
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub cost: Option<Money>,
    pub monthly_relief: Option<Money>,
    pub annual_rate: Option<f64>,
    pub priority_weight: Option<f64>,
    pub notes: Option<String>,
}

/// A goal with its payment progress
#[derive(Debug, Clone)]
pub struct GoalSummary {
    pub goal: Goal,
    pub paid: Money,
    /// `max(cost - paid, 0)`
    pub remaining: Money,
    /// Share of the cost already paid, 0..=100
    pub progress_percent: f64,
    pub payment_count: usize,
}

impl<'a> GoalService<'a> {
    /// Create a new goal service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn check_name(&self, name: &str, exclude: Option<GoalId>) -> CashplanResult<()> {
        if name.is_empty() {
            return Err(CashplanError::Validation("Goal name cannot be empty".into()));
        }
        if self.storage.goals.name_exists(name, exclude)? {
            return Err(CashplanError::Duplicate {
                entity_type: "Goal",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }

    fn require(&self, id: GoalId) -> CashplanResult<Goal> {
        self.storage
            .goals
            .get(id)?
            .ok_or_else(|| CashplanError::goal_not_found(id.to_string()))
    }

    /// Create a new goal
    pub fn create(&self, new: NewGoal) -> CashplanResult<Goal> {
        let name = new.name.trim();
        self.check_name(name, None)?;

        let mut goal = Goal::new(name, new.kind, new.cost);
        goal.monthly_relief = new.monthly_relief;
        goal.annual_rate = new.annual_rate;
        goal.priority_weight = new.priority_weight;
        if let Some(notes) = new.notes {
            goal.notes = notes;
        }

        goal.validate()
            .map_err(|e| CashplanError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        Ok(goal)
    }

    /// Get a goal by ID
    pub fn get(&self, id: GoalId) -> CashplanResult<Option<Goal>> {
        self.storage.goals.get(id)
    }

    /// Find a goal by name or ID string
    pub fn find(&self, identifier: &str) -> CashplanResult<Option<Goal>> {
        if let Some(goal) = self.storage.goals.get_by_name(identifier)? {
            return Ok(Some(goal));
        }

        if let Ok(id) = identifier.parse::<GoalId>() {
            return self.storage.goals.get(id);
        }

        Ok(None)
    }

    /// Find a goal or fail with a not-found error
    pub fn resolve(&self, identifier: &str) -> CashplanResult<Goal> {
        self.find(identifier)?
            .ok_or_else(|| CashplanError::goal_not_found(identifier))
    }

    /// List goals in creation order
    pub fn list(&self, include_cleared: bool) -> CashplanResult<Vec<Goal>> {
        if include_cleared {
            self.storage.goals.get_all()
        } else {
            self.storage.goals.get_active()
        }
    }

    /// Open goals ordered by `strategy`
    pub fn ranked(&self, strategy: Strategy) -> CashplanResult<Vec<RankedGoal>> {
        let goals = self.storage.goals.get_active()?;
        Ok(rank_goals(&goals, strategy))
    }

    /// Apply edits to a goal
    pub fn update(&self, id: GoalId, update: GoalUpdate) -> CashplanResult<Goal> {
        let mut goal = self.require(id)?;
        let before = goal.clone();

        if let Some(name) = update.name {
            let name = name.trim();
            self.check_name(name, Some(id))?;
            goal.name = name.to_string();
        }
        if let Some(cost) = update.cost {
            goal.cost = cost;
        }
        if let Some(relief) = update.monthly_relief {
            goal.monthly_relief = relief;
        }
        if let Some(rate) = update.annual_rate {
            goal.annual_rate = Some(rate);
        }
        if let Some(weight) = update.priority_weight {
            goal.priority_weight = weight;
        }
        if let Some(notes) = update.notes {
            goal.notes = notes;
        }
        goal.updated_at = chrono::Utc::now();

        goal.validate()
            .map_err(|e| CashplanError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
            None,
        )?;

        Ok(goal)
    }

    /// Record a payment toward a goal
    ///
    /// The goal is marked cleared once cumulative payments reach its cost.
    /// Returns the payment and the goal as it stands afterwards.
    pub fn record_payment(
        &self,
        id: GoalId,
        amount: Money,
        date: NaiveDate,
        note: &str,
    ) -> CashplanResult<(GoalPayment, Goal)> {
        if !amount.is_positive() {
            return Err(CashplanError::Validation(format!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }

        let mut goal = self.require(id)?;
        if !goal.is_active() {
            return Err(CashplanError::Validation(format!(
                "Goal '{}' is already cleared",
                goal.name
            )));
        }

        let payment = GoalPayment::new(id, amount, date, note.trim());
        self.storage.goals.add_payment(payment.clone())?;

        let mut audit = vec![AuditEntry::create(
            EntityType::GoalPayment,
            payment.id.to_string(),
            Some(goal.name.clone()),
            &payment,
        )];

        let paid = self.storage.goals.total_paid(id)?;
        if paid >= goal.cost {
            let before = goal.clone();
            goal.mark_cleared();
            self.storage.goals.upsert(goal.clone())?;
            audit.push(AuditEntry::update(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.name.clone()),
                &before,
                &goal,
                Some(format!("status: active -> cleared (paid {})", paid)),
            ));
        }

        self.storage.goals.save()?;
        self.storage.log_batch(&audit)?;

        Ok((payment, goal))
    }

    /// Payment history for a goal, newest first
    pub fn payments(&self, id: GoalId) -> CashplanResult<Vec<GoalPayment>> {
        self.require(id)?;
        self.storage.goals.payments_for(id)
    }

    /// Amount paid toward a goal so far
    pub fn amount_paid(&self, id: GoalId) -> CashplanResult<Money> {
        self.storage.goals.total_paid(id)
    }

    /// Goal with computed progress
    pub fn summary(&self, goal: &Goal) -> CashplanResult<GoalSummary> {
        let payments = self.storage.goals.payments_for(goal.id)?;
        let paid: Money = payments.iter().map(|p| p.amount).sum();
        let remaining = (goal.cost - paid).clamp_zero();

        let progress_percent = if goal.cost.is_positive() {
            (paid.cents() as f64 / goal.cost.cents() as f64 * 100.0).min(100.0)
        } else {
            100.0
        };

        Ok(GoalSummary {
            goal: goal.clone(),
            paid,
            remaining,
            progress_percent,
            payment_count: payments.len(),
        })
    }

    /// Reopen a cleared goal
    pub fn reopen(&self, id: GoalId) -> CashplanResult<Goal> {
        let mut goal = self.require(id)?;
        if goal.is_active() {
            return Err(CashplanError::Validation(format!(
                "Goal '{}' is not cleared",
                goal.name
            )));
        }

        let before = goal.clone();
        goal.reopen();
        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
            None,
        )?;

        Ok(goal)
    }

    /// Delete a goal and its payment history
    pub fn delete(&self, id: GoalId) -> CashplanResult<Goal> {
        let goal = self.require(id)?;

        self.storage.goals.delete(id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        Ok(goal)
    }
}

//! Goal ranking
//!
//! Scores goals under an interchangeable strategy and orders them from the
//! one to attack first to the one to attack last.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::CashplanError;
use crate::models::{Goal, GoalId, Money};

/// Goal prioritization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest monthly relief per unit of cost first
    #[default]
    Avalanche,
    /// Smallest cost first
    Snowball,
    /// Caller-assigned priority weight, highest first
    Custom,
}

impl Strategy {
    /// Score a single goal; higher scores rank first
    pub fn score(&self, goal: &Goal) -> f64 {
        match self {
            Self::Avalanche => {
                if goal.cost.is_positive() {
                    goal.monthly_relief.cents() as f64 / goal.cost.cents() as f64
                } else {
                    0.0
                }
            }
            Self::Snowball => -goal.cost.as_units(),
            Self::Custom => goal.priority_weight,
        }
    }
}

impl FromStr for Strategy {
    type Err = CashplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avalanche" => Ok(Self::Avalanche),
            "snowball" => Ok(Self::Snowball),
            "custom" => Ok(Self::Custom),
            other => Err(CashplanError::InvalidInput(format!(
                "unknown strategy '{}'. Valid strategies: avalanche, snowball, custom",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avalanche => write!(f, "avalanche"),
            Self::Snowball => write!(f, "snowball"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A goal's dimensionless priority score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalScore {
    pub goal_id: GoalId,
    pub score: f64,
}

/// A goal in ranked position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGoal {
    pub goal_id: GoalId,
    pub name: String,
    pub cost: Money,
    pub score: f64,
}

/// Score every goal, in input order
pub fn score_goals(goals: &[Goal], strategy: Strategy) -> Vec<GoalScore> {
    goals
        .iter()
        .map(|goal| GoalScore {
            goal_id: goal.id,
            score: strategy.score(goal),
        })
        .collect()
}

/// Order goals by descending score
///
/// The sort is stable: goals with exactly equal scores keep their input order.
pub fn rank_goals(goals: &[Goal], strategy: Strategy) -> Vec<RankedGoal> {
    let mut ranked: Vec<RankedGoal> = goals
        .iter()
        .zip(score_goals(goals, strategy))
        .map(|(goal, scored)| RankedGoal {
            goal_id: goal.id,
            name: goal.name.clone(),
            cost: goal.cost,
            score: scored.score,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        %strategy,
        goals = ranked.len(),
        top = ranked.first().map(|g| g.name.as_str()).unwrap_or("-"),
        "ranked goals"
    );

    ranked
}

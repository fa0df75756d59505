//! Goal model
//!
//! A goal is a debt to pay off or a savings target to reach. Goals are read
//! by the ranking engine; their status moves to `Cleared` once recorded
//! payments cover the cost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// Whether a goal is a debt or a savings target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    #[default]
    Debt,
    Savings,
}

impl GoalKind {
    /// Parse a goal kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debt" | "loan" => Some(Self::Debt),
            "savings" | "saving" | "target" => Some(Self::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debt => write!(f, "Debt"),
            Self::Savings => write!(f, "Savings"),
        }
    }
}

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Cleared,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Cleared => write!(f, "Cleared"),
        }
    }
}

/// A payoff or savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    #[serde(default)]
    pub kind: GoalKind,

    /// Amount required to clear the debt or reach the target
    pub cost: Money,

    /// Recurring monthly burden removed once the goal is cleared
    #[serde(default)]
    pub monthly_relief: Money,

    /// Annual interest rate in percent; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<f64>,

    /// Caller-assigned weight used by the custom ranking strategy
    #[serde(default)]
    pub priority_weight: f64,

    #[serde(default)]
    pub status: GoalStatus,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: impl Into<String>, kind: GoalKind, cost: Money) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            kind,
            cost,
            monthly_relief: Money::zero(),
            annual_rate: None,
            priority_weight: 0.0,
            status: GoalStatus::Active,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a debt goal with the monthly burden it removes
    pub fn debt(name: impl Into<String>, cost: Money, monthly_relief: Money) -> Self {
        let mut goal = Self::new(name, GoalKind::Debt, cost);
        goal.monthly_relief = monthly_relief;
        goal
    }

    /// Create a savings goal
    pub fn savings(name: impl Into<String>, cost: Money) -> Self {
        Self::new(name, GoalKind::Savings, cost)
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    pub fn set_priority_weight(&mut self, weight: f64) {
        self.priority_weight = weight;
        self.updated_at = Utc::now();
    }

    pub fn mark_cleared(&mut self) {
        self.status = GoalStatus::Cleared;
        self.updated_at = Utc::now();
    }

    pub fn reopen(&mut self) {
        self.status = GoalStatus::Active;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if self.cost.is_negative() {
            return Err(GoalValidationError::NegativeCost);
        }

        if self.monthly_relief.is_negative() {
            return Err(GoalValidationError::NegativeRelief);
        }

        if !self.priority_weight.is_finite() {
            return Err(GoalValidationError::InvalidWeight);
        }

        if let Some(rate) = self.annual_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(GoalValidationError::InvalidRate);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NegativeCost,
    NegativeRelief,
    InvalidWeight,
    InvalidRate,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NegativeCost => write!(f, "Goal cost cannot be negative"),
            Self::NegativeRelief => write!(f, "Monthly relief cannot be negative"),
            Self::InvalidWeight => write!(f, "Priority weight must be a finite number"),
            Self::InvalidRate => write!(f, "Annual rate must be a non-negative number"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

//! Payoff efficiency
//!
//! For one goal and a proposed monthly contribution, reports how much
//! contribution effort a fixed unit of money represents and how many months
//! the outstanding amount takes to clear.

use serde::Serialize;

use crate::models::{Goal, Money};

/// Currency units the efficiency figure is expressed against (K)
///
/// `per_unit = EFFICIENCY_UNIT / contribution`, e.g. a 300.00 contribution
/// gives 3.33 per 1,000.
pub const EFFICIENCY_UNIT: f64 = 1000.0;

/// The outstanding amount of one goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayoffInput {
    pub cost: Money,
    /// Cumulative payments already made; the engine does not read history
    pub amount_paid: Money,
}

impl PayoffInput {
    pub fn new(cost: Money, amount_paid: Money) -> Self {
        Self { cost, amount_paid }
    }

    pub fn from_goal(goal: &Goal, amount_paid: Money) -> Self {
        Self::new(goal.cost, amount_paid)
    }

    /// What is still owed, never negative
    pub fn remaining(&self) -> Money {
        (self.cost - self.amount_paid).clamp_zero()
    }
}

/// Efficiency figures for a contribution; `None` means not computable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoffEfficiency {
    pub remaining: Money,
    /// `EFFICIENCY_UNIT / contribution`, rounded to two decimals
    pub per_unit: Option<f64>,
    /// `ceil(remaining / contribution)`; zero once nothing is owed
    pub months_to_clear: Option<u32>,
}

impl PayoffEfficiency {
    pub fn is_computable(&self) -> bool {
        self.months_to_clear.is_some()
    }
}

/// Compute payoff efficiency for a proposed monthly contribution
///
/// A contribution of zero or less is not computable and yields `None` for
/// both figures.
pub fn payoff_efficiency(input: &PayoffInput, contribution: Money) -> PayoffEfficiency {
    let remaining = input.remaining();

    if !contribution.is_positive() {
        return PayoffEfficiency {
            remaining,
            per_unit: None,
            months_to_clear: None,
        };
    }

    let per_unit = (EFFICIENCY_UNIT / contribution.as_units() * 100.0).round() / 100.0;

    let cents = contribution.cents();
    let owed = remaining.cents();
    let months = owed / cents + i64::from(owed % cents != 0);

    PayoffEfficiency {
        remaining,
        per_unit: Some(per_unit),
        months_to_clear: Some(u32::try_from(months).unwrap_or(u32::MAX)),
    }
}

//! Summary service
//!
//! Headline figures for the whole plan: money held in buckets, ledger
//! inflow and outflow for one calendar month and for all time, open goals,
//! and the declared monthly budget.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::settings::Settings;
use crate::error::{CashplanError, CashplanResult};
use crate::models::{EntryKind, LedgerEntry, Money};
use crate::storage::Storage;

/// Service for the plan summary
pub struct SummaryService<'a> {
    storage: &'a Storage,
}

/// Money in and out over some window of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flow {
    pub income: Money,
    /// Expenses plus transfers out
    pub outflow: Money,
}

impl Flow {
    fn from_entries(entries: &[LedgerEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut flow, entry| {
            match entry.kind {
                EntryKind::Income => flow.income += entry.amount,
                EntryKind::Expense | EntryKind::Transfer => flow.outflow += entry.amount,
            }
            flow
        })
    }
}

/// Headline figures for the plan
#[derive(Debug, Clone)]
pub struct PlanSummary {
    /// Balance across every bucket, inactive ones included
    pub total_balance: Money,
    pub bucket_count: usize,
    /// First day of the reported month
    pub month_start: NaiveDate,
    /// Last day of the reported month
    pub month_end: NaiveDate,
    pub month: Flow,
    pub all_time: Flow,
    pub active_goals: usize,
    pub cleared_goals: usize,
    pub declared_income: Money,
    pub declared_expense: Money,
}

impl PlanSummary {
    /// Declared income minus declared expense, never negative
    pub fn declared_margin(&self) -> Money {
        (self.declared_income - self.declared_expense).clamp_zero()
    }
}

/// First and last day of the month containing `date`
pub fn month_bounds(date: NaiveDate) -> CashplanResult<(NaiveDate, NaiveDate)> {
    let out_of_range = || CashplanError::InvalidInput(format!("no calendar month around {}", date));

    let start = date.with_day(1).ok_or_else(out_of_range)?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

impl<'a> SummaryService<'a> {
    /// Create a new summary service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Summarize the plan for the calendar month containing `date`
    pub fn summary(&self, settings: &Settings, date: NaiveDate) -> CashplanResult<PlanSummary> {
        let (month_start, month_end) = month_bounds(date)?;

        let buckets = self.storage.buckets.get_all()?;
        let goals = self.storage.goals.get_all()?;
        let active_goals = goals.iter().filter(|g| g.is_active()).count();

        let month = Flow::from_entries(&self.storage.ledger.in_range(month_start, month_end)?);
        let all_time = Flow::from_entries(&self.storage.ledger.get_all()?);

        Ok(PlanSummary {
            total_balance: buckets.iter().map(|b| b.balance).sum(),
            bucket_count: buckets.len(),
            month_start,
            month_end,
            month,
            all_time,
            active_goals,
            cleared_goals: goals.len() - active_goals,
            declared_income: settings.monthly_income,
            declared_expense: settings.monthly_expense,
        })
    }
}

//! Ledger records
//!
//! Cash-book movements against buckets and payments made toward goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BucketId, GoalId, LedgerEntryId, PaymentId};
use super::money::Money;

/// Direction of a ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money coming into a bucket
    Income,
    /// Money spent out of a bucket
    Expense,
    /// Money moved out of a bucket into another one
    Transfer,
}

impl EntryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Sign applied to the entry amount when updating a bucket balance
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense | Self::Transfer => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// One cash-book row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    /// The bucket touched; `None` once that bucket has been deleted
    pub bucket_id: Option<BucketId>,
    pub kind: EntryKind,
    /// Always positive; `kind` carries the direction
    pub amount: Money,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        bucket_id: BucketId,
        kind: EntryKind,
        amount: Money,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            bucket_id: Some(bucket_id),
            kind,
            amount,
            description: description.into(),
            date,
            created_at: Utc::now(),
        }
    }

    /// The change this entry applies to its bucket's balance
    pub fn balance_delta(&self) -> Money {
        self.kind.signed(self.amount)
    }
}

/// A payment made toward a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPayment {
    pub id: PaymentId,
    pub goal_id: GoalId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl GoalPayment {
    pub fn new(goal_id: GoalId, amount: Money, date: NaiveDate, note: impl Into<String>) -> Self {
        Self {
            id: PaymentId::new(),
            goal_id,
            amount,
            date,
            note: note.into(),
            created_at: Utc::now(),
        }
    }
}

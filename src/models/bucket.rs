//! Bucket model
//!
//! A bucket is a weighted spending/savings category that receives a share of
//! every income split and holds a running balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BucketId;
use super::money::Money;

/// A weighted category holding a running balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Unique identifier
    pub id: BucketId,

    /// Display name (e.g., "Operations")
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Weight on a 0..100 scale; the allocator normalizes, so the stored
    /// weights do not have to sum to 100
    pub percent: f64,

    /// Skim-first bucket: funded from the untouched income before the
    /// proportional distribution (e.g. a tithe)
    #[serde(default)]
    pub priority_pre: bool,

    /// Free-form kind label
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Inactive buckets are skipped by the allocator
    #[serde(default = "default_active")]
    pub active: bool,

    /// Running balance owned by this bucket
    #[serde(default)]
    pub balance: Money,

    /// When the bucket was created
    pub created_at: DateTime<Utc>,

    /// When the bucket was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_kind() -> String {
    "generic".to_string()
}

fn default_active() -> bool {
    true
}

impl Bucket {
    /// Create a new active bucket with a zero balance
    pub fn new(name: impl Into<String>, percent: f64) -> Self {
        let now = Utc::now();
        Self {
            id: BucketId::new(),
            name: name.into(),
            description: String::new(),
            percent,
            priority_pre: false,
            kind: default_kind(),
            active: true,
            balance: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a skim-first bucket
    pub fn skim(name: impl Into<String>, percent: f64) -> Self {
        let mut bucket = Self::new(name, percent);
        bucket.priority_pre = true;
        bucket
    }

    /// Set the weight
    pub fn set_percent(&mut self, percent: f64) {
        self.percent = percent;
        self.updated_at = Utc::now();
    }

    /// Add money to the balance (negative amounts withdraw)
    ///
    /// The balance is left untouched if the result would overflow.
    pub fn apply_delta(&mut self, delta: Money) -> Result<(), BucketValidationError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(BucketValidationError::BalanceOverflow)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Stop allocating to this bucket
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Resume allocating to this bucket
    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the bucket
    pub fn validate(&self) -> Result<(), BucketValidationError> {
        if self.name.trim().is_empty() {
            return Err(BucketValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(BucketValidationError::NameTooLong(self.name.len()));
        }

        if !self.percent.is_finite() || self.percent < 0.0 {
            return Err(BucketValidationError::InvalidPercent(self.percent));
        }

        Ok(())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.name, self.percent)
    }
}

/// Validation errors for buckets
#[derive(Debug, Clone, PartialEq)]
pub enum BucketValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidPercent(f64),
    BalanceOverflow,
}

impl fmt::Display for BucketValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Bucket name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Bucket name too long ({} chars, max 100)", len)
            }
            Self::InvalidPercent(p) => {
                write!(f, "Bucket percent must be a non-negative number, got {}", p)
            }
            Self::BalanceOverflow => write!(f, "Bucket balance out of range"),
        }
    }
}

impl std::error::Error for BucketValidationError {}

//! Income service
//!
//! Splits a day's income across the buckets and books the result.

use chrono::NaiveDate;
use tracing::warn;

use crate::audit::{AuditEntry, EntityType};
use crate::engine::{split_by_buckets, Allocation, SplitOptions};
use crate::error::{CashplanError, CashplanResult};
use crate::models::{Bucket, EntryKind, LedgerEntry, Money};
use crate::storage::Storage;

/// Service for income splits
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

/// A split that has been applied to the buckets
#[derive(Debug, Clone)]
pub struct AppliedSplit {
    pub allocation: Allocation,
    /// One ledger entry per non-zero share
    pub entries: Vec<LedgerEntry>,
}

impl<'a> IncomeService<'a> {
    /// Create a new income service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Compute the split without touching any balance
    pub fn preview(&self, amount: Money, options: SplitOptions) -> CashplanResult<Allocation> {
        let buckets = self.storage.buckets.get_all()?;
        split_by_buckets(&buckets, amount, options)
    }

    /// Split `amount` and add each share to its bucket
    ///
    /// Every balance change and ledger entry is staged before a single save,
    /// so a failed split leaves storage untouched. Money no bucket could take
    /// stays out of the buckets and is reported on the allocation.
    pub fn apply(
        &self,
        amount: Money,
        date: NaiveDate,
        description: &str,
        options: SplitOptions,
    ) -> CashplanResult<AppliedSplit> {
        let buckets = self.storage.buckets.get_all()?;
        let allocation = split_by_buckets(&buckets, amount, options)?;

        if allocation.has_unallocated() {
            warn!(
                unallocated = %allocation.unallocated,
                "income split left money unallocated"
            );
        }

        let description = if description.trim().is_empty() {
            format!("Income split ({})", allocation.policy)
        } else {
            description.trim().to_string()
        };

        let mut updated: Vec<Bucket> = Vec::new();
        let mut entries = Vec::new();
        let mut audit = Vec::new();

        for share in allocation.shares.iter().filter(|s| !s.amount.is_zero()) {
            let Some(before) = buckets.iter().find(|b| b.id == share.bucket_id) else {
                continue;
            };

            let mut after = before.clone();
            after.apply_delta(share.amount)
                .map_err(|e| CashplanError::Validation(e.to_string()))?;

            let entry = LedgerEntry::new(
                share.bucket_id,
                EntryKind::Income,
                share.amount,
                date,
                description.clone(),
            );

            audit.push(AuditEntry::create(
                EntityType::LedgerEntry,
                entry.id.to_string(),
                Some(after.name.clone()),
                &entry,
            ));
            audit.push(AuditEntry::update(
                EntityType::Bucket,
                after.id.to_string(),
                Some(after.name.clone()),
                before,
                &after,
                Some(format!("balance: {} -> {}", before.balance, after.balance)),
            ));

            updated.push(after);
            entries.push(entry);
        }

        self.storage.buckets.replace_all(&updated)?;
        self.storage.ledger.append(entries.iter().cloned())?;
        self.storage.buckets.save()?;
        self.storage.ledger.save()?;
        self.storage.log_batch(&audit)?;

        Ok(AppliedSplit {
            allocation,
            entries,
        })
    }
}

//! Ledger service
//!
//! Manual movements against bucket balances: income, expenses and transfers.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{CashplanError, CashplanResult};
use crate::models::{Bucket, BucketId, EntryKind, LedgerEntry, Money};
use crate::storage::Storage;

/// Service for ledger movements
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn require(&self, id: BucketId) -> CashplanResult<Bucket> {
        self.storage
            .buckets
            .get(id)?
            .ok_or_else(|| CashplanError::bucket_not_found(id.to_string()))
    }

    fn check_amount(amount: Money) -> CashplanResult<()> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(CashplanError::Validation(format!(
                "Amount must be positive, got {}",
                amount
            )))
        }
    }

    fn check_funds(bucket: &Bucket, amount: Money, allow_negative: bool) -> CashplanResult<()> {
        if !allow_negative && bucket.balance < amount {
            return Err(CashplanError::InsufficientFunds {
                bucket: bucket.name.clone(),
                needed: amount,
                available: bucket.balance,
            });
        }
        Ok(())
    }

    /// Apply staged entries to their buckets and persist everything at once
    fn book(&self, staged: Vec<(Bucket, LedgerEntry)>) -> CashplanResult<Vec<LedgerEntry>> {
        let mut updated = Vec::with_capacity(staged.len());
        let mut entries = Vec::with_capacity(staged.len());
        let mut audit = Vec::with_capacity(staged.len() * 2);

        for (before, entry) in staged {
            let mut after = before.clone();
            after.apply_delta(entry.balance_delta())
                .map_err(|e| CashplanError::Validation(e.to_string()))?;

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
                &before,
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

        Ok(entries)
    }

    /// Add money to a bucket outside of an income split
    pub fn record_income(
        &self,
        bucket_id: BucketId,
        amount: Money,
        date: NaiveDate,
        description: &str,
    ) -> CashplanResult<LedgerEntry> {
        Self::check_amount(amount)?;
        let bucket = self.require(bucket_id)?;

        let entry = LedgerEntry::new(bucket_id, EntryKind::Income, amount, date, description.trim());
        let mut booked = self.book(vec![(bucket, entry)])?;
        booked
            .pop()
            .ok_or_else(|| CashplanError::Storage("income entry was not booked".into()))
    }

    /// Spend money from a bucket
    pub fn record_expense(
        &self,
        bucket_id: BucketId,
        amount: Money,
        date: NaiveDate,
        description: &str,
        allow_negative: bool,
    ) -> CashplanResult<LedgerEntry> {
        Self::check_amount(amount)?;
        let bucket = self.require(bucket_id)?;
        Self::check_funds(&bucket, amount, allow_negative)?;

        let entry = LedgerEntry::new(bucket_id, EntryKind::Expense, amount, date, description.trim());
        let mut booked = self.book(vec![(bucket, entry)])?;
        booked
            .pop()
            .ok_or_else(|| CashplanError::Storage("expense entry was not booked".into()))
    }

    /// Move money between two buckets
    ///
    /// Books a `transfer` entry on the source and an `income` entry on the
    /// destination.
    pub fn transfer(
        &self,
        from: BucketId,
        to: BucketId,
        amount: Money,
        date: NaiveDate,
        description: &str,
        allow_negative: bool,
    ) -> CashplanResult<(LedgerEntry, LedgerEntry)> {
        Self::check_amount(amount)?;
        if from == to {
            return Err(CashplanError::Validation(
                "Cannot transfer a bucket to itself".into(),
            ));
        }

        let source = self.require(from)?;
        let destination = self.require(to)?;
        Self::check_funds(&source, amount, allow_negative)?;

        let description = description.trim();
        let out_note = if description.is_empty() {
            format!("Transfer to {}", destination.name)
        } else {
            description.to_string()
        };
        let in_note = if description.is_empty() {
            format!("Transfer from {}", source.name)
        } else {
            description.to_string()
        };

        let outgoing = LedgerEntry::new(from, EntryKind::Transfer, amount, date, out_note);
        let incoming = LedgerEntry::new(to, EntryKind::Income, amount, date, in_note);

        let mut booked = self
            .book(vec![(source, outgoing), (destination, incoming)])?
            .into_iter();
        match (booked.next(), booked.next()) {
            (Some(outgoing), Some(incoming)) => Ok((outgoing, incoming)),
            _ => Err(CashplanError::Storage("transfer entries were not booked".into())),
        }
    }

    /// Ledger history, newest first, optionally limited to one bucket
    ///
    /// Entries on the same date list the most recently booked first.
    pub fn history(&self, bucket_id: Option<BucketId>) -> CashplanResult<Vec<LedgerEntry>> {
        let mut entries = match bucket_id {
            Some(id) => self.storage.ledger.for_bucket(id)?,
            None => self.storage.ledger.get_all()?,
        };
        entries.reverse();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Check a bucket's stored balance against the sum of its ledger entries
    ///
    /// Returns `(stored, from_ledger)`. They drift apart when balances were
    /// edited outside the ledger, e.g. by a plan import.
    pub fn reconcile(&self, bucket_id: BucketId) -> CashplanResult<(Money, Money)> {
        let bucket = self.require(bucket_id)?;
        let from_ledger: Money = self
            .storage
            .ledger
            .for_bucket(bucket_id)?
            .iter()
            .map(|e| e.balance_delta())
            .sum();
        Ok((bucket.balance, from_ledger))
    }
}

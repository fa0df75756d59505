//! Bucket service
//!
//! Business logic for bucket management: CRUD, activation and normalizing the
//! stored percents.

use crate::audit::{AuditEntry, EntityType};
use crate::engine::normalize_percentages;
use crate::error::{CashplanError, CashplanResult};
use crate::models::{Bucket, BucketId};
use crate::storage::Storage;

/// Service for bucket management
pub struct BucketService<'a> {
    storage: &'a Storage,
}

/// Fields for a new bucket
#[derive(Debug, Clone, Default)]
pub struct NewBucket {
    pub name: String,
    pub percent: f64,
    pub priority_pre: bool,
    pub kind: Option<String>,
    pub description: Option<String>,
}

/// Optional edits to an existing bucket
#[derive(Debug, Clone, Default)]
pub struct BucketUpdate {
    pub name: Option<String>,
    pub percent: Option<f64>,
    pub priority_pre: Option<bool>,
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl<'a> BucketService<'a> {
    /// Create a new bucket service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn check_name(&self, name: &str, exclude: Option<BucketId>) -> CashplanResult<()> {
        if name.is_empty() {
            return Err(CashplanError::Validation("Bucket name cannot be empty".into()));
        }
        if self.storage.buckets.name_exists(name, exclude)? {
            return Err(CashplanError::Duplicate {
                entity_type: "Bucket",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }

    fn require(&self, id: BucketId) -> CashplanResult<Bucket> {
        self.storage
            .buckets
            .get(id)?
            .ok_or_else(|| CashplanError::bucket_not_found(id.to_string()))
    }

    /// Create a new bucket
    pub fn create(&self, new: NewBucket) -> CashplanResult<Bucket> {
        let name = new.name.trim();
        self.check_name(name, None)?;

        let mut bucket = if new.priority_pre {
            Bucket::skim(name, new.percent)
        } else {
            Bucket::new(name, new.percent)
        };
        if let Some(kind) = new.kind {
            bucket.kind = kind;
        }
        if let Some(description) = new.description {
            bucket.description = description;
        }

        bucket
            .validate()
            .map_err(|e| CashplanError::Validation(e.to_string()))?;

        self.storage.buckets.upsert(bucket.clone())?;
        self.storage.buckets.save()?;

        self.storage.log_create(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &bucket,
        )?;

        Ok(bucket)
    }

    /// Get a bucket by ID
    pub fn get(&self, id: BucketId) -> CashplanResult<Option<Bucket>> {
        self.storage.buckets.get(id)
    }

    /// Find a bucket by name or ID string
    pub fn find(&self, identifier: &str) -> CashplanResult<Option<Bucket>> {
        if let Some(bucket) = self.storage.buckets.get_by_name(identifier)? {
            return Ok(Some(bucket));
        }

        if let Ok(id) = identifier.parse::<BucketId>() {
            return self.storage.buckets.get(id);
        }

        Ok(None)
    }

    /// Find a bucket or fail with a not-found error
    pub fn resolve(&self, identifier: &str) -> CashplanResult<Bucket> {
        self.find(identifier)?
            .ok_or_else(|| CashplanError::bucket_not_found(identifier))
    }

    /// List buckets in creation order
    pub fn list(&self, include_inactive: bool) -> CashplanResult<Vec<Bucket>> {
        if include_inactive {
            self.storage.buckets.get_all()
        } else {
            self.storage.buckets.get_active()
        }
    }

    /// Sum of the stored percents of the active buckets
    pub fn percent_sum(&self) -> CashplanResult<f64> {
        Ok(self
            .storage
            .buckets
            .get_active()?
            .iter()
            .map(|b| b.percent)
            .sum())
    }

    /// Apply edits to a bucket
    pub fn update(&self, id: BucketId, update: BucketUpdate) -> CashplanResult<Bucket> {
        let mut bucket = self.require(id)?;
        let before = bucket.clone();

        if let Some(name) = update.name {
            let name = name.trim();
            self.check_name(name, Some(id))?;
            bucket.name = name.to_string();
        }
        if let Some(percent) = update.percent {
            bucket.percent = percent;
        }
        if let Some(priority_pre) = update.priority_pre {
            bucket.priority_pre = priority_pre;
        }
        if let Some(kind) = update.kind {
            bucket.kind = kind;
        }
        if let Some(description) = update.description {
            bucket.description = description;
        }
        bucket.updated_at = chrono::Utc::now();

        bucket
            .validate()
            .map_err(|e| CashplanError::Validation(e.to_string()))?;

        self.storage.buckets.upsert(bucket.clone())?;
        self.storage.buckets.save()?;

        self.storage.log_update(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &before,
            &bucket,
            None,
        )?;

        Ok(bucket)
    }

    /// Rewrite the stored percents of the active buckets so they sum to 100
    ///
    /// Rejected when the active percents sum to zero, since there is nothing
    /// to rescale.
    pub fn normalize(&self) -> CashplanResult<Vec<Bucket>> {
        let buckets = self.storage.buckets.get_active()?;
        let sum: f64 = buckets.iter().map(|b| b.percent).sum();
        if sum <= 0.0 {
            return Err(CashplanError::InvalidInput(
                "bucket percents sum to zero, nothing to normalize".into(),
            ));
        }

        let percents = normalize_percentages(&buckets)?;

        let mut updated = Vec::with_capacity(buckets.len());
        let mut audit = Vec::new();
        for (bucket, percent) in buckets.into_iter().zip(percents) {
            if bucket.percent == percent {
                updated.push(bucket);
                continue;
            }
            let mut after = bucket.clone();
            after.set_percent(percent);
            audit.push(AuditEntry::update(
                EntityType::Bucket,
                after.id.to_string(),
                Some(after.name.clone()),
                &bucket,
                &after,
                Some(format!("percent: {} -> {}", bucket.percent, percent)),
            ));
            updated.push(after);
        }

        self.storage.buckets.replace_all(&updated)?;
        self.storage.buckets.save()?;
        self.storage.log_batch(&audit)?;

        Ok(updated)
    }

    /// Mark a bucket active or inactive; inactive buckets receive no income
    pub fn set_active(&self, id: BucketId, active: bool) -> CashplanResult<Bucket> {
        let mut bucket = self.require(id)?;

        if bucket.active == active {
            return Err(CashplanError::Validation(format!(
                "Bucket '{}' is already {}",
                bucket.name,
                if active { "active" } else { "inactive" }
            )));
        }

        let before = bucket.clone();
        if active {
            bucket.activate();
        } else {
            bucket.deactivate();
        }

        self.storage.buckets.upsert(bucket.clone())?;
        self.storage.buckets.save()?;

        self.storage.log_update(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &before,
            &bucket,
            Some(format!("active: {} -> {}", before.active, bucket.active)),
        )?;

        Ok(bucket)
    }

    /// Delete a bucket
    ///
    /// A bucket still holding money is only deleted with `force`. Its ledger
    /// history is kept but no longer linked to a bucket.
    pub fn delete(&self, id: BucketId, force: bool) -> CashplanResult<Bucket> {
        let bucket = self.require(id)?;

        if !bucket.balance.is_zero() && !force {
            return Err(CashplanError::Validation(format!(
                "Cannot delete bucket '{}' - it still holds {}. Use --force to delete it anyway.",
                bucket.name, bucket.balance
            )));
        }

        self.storage.buckets.delete(id)?;
        let detached = self.storage.ledger.detach_bucket(id)?;
        self.storage.buckets.save()?;
        if detached > 0 {
            self.storage.ledger.save()?;
        }

        self.storage.log_delete(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &bucket,
        )?;

        Ok(bucket)
    }
}

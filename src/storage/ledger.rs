//! Ledger repository for JSON storage
//!
//! Append-only cash book of movements against buckets.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::CashplanError;
use crate::models::{BucketId, LedgerEntry};

use super::file_io::{read_json, write_json_atomic};

/// Serializable ledger data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct LedgerData {
    entries: Vec<LedgerEntry>,
}

/// Repository for ledger persistence
pub struct LedgerRepository {
    path: PathBuf,
    data: RwLock<Vec<LedgerEntry>>,
}

impl LedgerRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<LedgerEntry>>, CashplanError> {
        self.data
            .read()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Vec<LedgerEntry>>, CashplanError> {
        self.data
            .write()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn load(&self) -> Result<(), CashplanError> {
        let file_data: LedgerData = read_json(&self.path)?;
        *self.write_lock()? = file_data.entries;
        Ok(())
    }

    pub fn save(&self) -> Result<(), CashplanError> {
        let file_data = LedgerData {
            entries: self.read_lock()?.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Append entries in the given order
    pub fn append(&self, entries: impl IntoIterator<Item = LedgerEntry>) -> Result<(), CashplanError> {
        self.write_lock()?.extend(entries);
        Ok(())
    }

    /// All entries, oldest first
    pub fn get_all(&self) -> Result<Vec<LedgerEntry>, CashplanError> {
        Ok(self.read_lock()?.clone())
    }

    /// Entries for one bucket, oldest first
    pub fn for_bucket(&self, bucket_id: BucketId) -> Result<Vec<LedgerEntry>, CashplanError> {
        Ok(self
            .read_lock()?
            .iter()
            .filter(|e| e.bucket_id == Some(bucket_id))
            .cloned()
            .collect())
    }

    /// Entries dated within `[start, end]`, oldest first
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LedgerEntry>, CashplanError> {
        Ok(self
            .read_lock()?
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }

    /// Unlink entries from a deleted bucket; history is kept
    pub fn detach_bucket(&self, bucket_id: BucketId) -> Result<usize, CashplanError> {
        let mut data = self.write_lock()?;
        let mut detached = 0;
        for entry in data.iter_mut().filter(|e| e.bucket_id == Some(bucket_id)) {
            entry.bucket_id = None;
            detached += 1;
        }
        Ok(detached)
    }

    pub fn count(&self) -> Result<usize, CashplanError> {
        Ok(self.read_lock()?.len())
    }
}

//! Bucket repository for JSON storage
//!
//! Manages loading and saving buckets to buckets.json. Buckets keep the order
//! they were created in; the allocator reports shares in that order.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CashplanError;
use crate::models::{Bucket, BucketId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable bucket data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BucketData {
    buckets: Vec<Bucket>,
}

/// Repository for bucket persistence
pub struct BucketRepository {
    path: PathBuf,
    data: RwLock<Vec<Bucket>>,
}

impl BucketRepository {
    /// Create a new bucket repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Bucket>>, CashplanError> {
        self.data
            .read()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Bucket>>, CashplanError> {
        self.data
            .write()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load buckets from disk
    pub fn load(&self) -> Result<(), CashplanError> {
        let file_data: BucketData = read_json(&self.path)?;
        *self.write_lock()? = file_data.buckets;
        Ok(())
    }

    /// Save buckets to disk
    pub fn save(&self) -> Result<(), CashplanError> {
        let file_data = BucketData {
            buckets: self.read_lock()?.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a bucket by ID
    pub fn get(&self, id: BucketId) -> Result<Option<Bucket>, CashplanError> {
        Ok(self.read_lock()?.iter().find(|b| b.id == id).cloned())
    }

    /// Get all buckets in creation order
    pub fn get_all(&self) -> Result<Vec<Bucket>, CashplanError> {
        Ok(self.read_lock()?.clone())
    }

    /// Get all active buckets in creation order
    pub fn get_active(&self) -> Result<Vec<Bucket>, CashplanError> {
        Ok(self
            .read_lock()?
            .iter()
            .filter(|b| b.active)
            .cloned()
            .collect())
    }

    /// Get a bucket by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Bucket>, CashplanError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read_lock()?
            .iter()
            .find(|b| b.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert a new bucket at the end, or replace an existing one in place
    pub fn upsert(&self, bucket: Bucket) -> Result<(), CashplanError> {
        let mut data = self.write_lock()?;
        match data.iter_mut().find(|b| b.id == bucket.id) {
            Some(existing) => *existing = bucket,
            None => data.push(bucket),
        }
        Ok(())
    }

    /// Replace several buckets at once; all of them must already exist
    pub fn replace_all(&self, buckets: &[Bucket]) -> Result<(), CashplanError> {
        let mut data = self.write_lock()?;

        if let Some(missing) = buckets.iter().find(|b| !data.iter().any(|d| d.id == b.id)) {
            return Err(CashplanError::bucket_not_found(missing.id.to_string()));
        }

        for bucket in buckets {
            if let Some(existing) = data.iter_mut().find(|b| b.id == bucket.id) {
                *existing = bucket.clone();
            }
        }
        Ok(())
    }

    /// Delete a bucket
    pub fn delete(&self, id: BucketId) -> Result<bool, CashplanError> {
        let mut data = self.write_lock()?;
        let before = data.len();
        data.retain(|b| b.id != id);
        Ok(data.len() != before)
    }

    /// Check if a bucket name is already taken
    pub fn name_exists(&self, name: &str, exclude_id: Option<BucketId>) -> Result<bool, CashplanError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read_lock()?
            .iter()
            .any(|b| b.name.to_lowercase() == name_lower && Some(b.id) != exclude_id))
    }

    /// Count buckets
    pub fn count(&self) -> Result<usize, CashplanError> {
        Ok(self.read_lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BucketRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("buckets.json");
        let repo = BucketRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_temp_dir, repo) = create_test_repo();
        for name in ["Zeta", "Alpha", "Mid"] {
            repo.upsert(Bucket::new(name, 10.0)).unwrap();
        }

        let names: Vec<String> = repo.get_all().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (_temp_dir, repo) = create_test_repo();
        let first = Bucket::new("First", 50.0);
        let mut second = Bucket::new("Second", 50.0);
        repo.upsert(first.clone()).unwrap();
        repo.upsert(second.clone()).unwrap();

        second.apply_delta(Money::from_cents(700)).unwrap();
        repo.upsert(second.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].balance.cents(), 700);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let bucket = Bucket::skim("Tithe", 10.0);
        let id = bucket.id;
        repo.upsert(bucket).unwrap();
        repo.save().unwrap();

        let repo2 = BucketRepository::new(temp_dir.path().join("buckets.json"));
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert!(loaded.priority_pre);
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Bucket::new("Attack", 20.0)).unwrap();

        assert!(repo.get_by_name("attack").unwrap().is_some());
        assert!(repo.name_exists("ATTACK", None).unwrap());
        assert!(repo.get_by_name("defense").unwrap().is_none());
    }

    #[test]
    fn test_replace_all_rejects_unknown() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Bucket::new("Known", 20.0)).unwrap();

        let result = repo.replace_all(&[Bucket::new("Stranger", 1.0)]);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_active_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let mut idle = Bucket::new("Idle", 5.0);
        idle.deactivate();
        let idle_id = idle.id;
        repo.upsert(Bucket::new("Live", 95.0)).unwrap();
        repo.upsert(idle).unwrap();

        assert_eq!(repo.get_active().unwrap().len(), 1);
        assert!(repo.delete(idle_id).unwrap());
        assert!(!repo.delete(idle_id).unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }
}

//! Goal repository for JSON storage
//!
//! Goals and the payments made toward them share goals.json.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CashplanError;
use crate::models::{Goal, GoalId, GoalPayment, Money};

use super::file_io::{read_json, write_json_atomic};

/// Serializable goal data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    goals: Vec<Goal>,
    #[serde(default)]
    payments: Vec<GoalPayment>,
}

/// Repository for goal persistence
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<GoalData>,
}

impl GoalRepository {
    /// Create a new goal repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(GoalData::default()),
        }
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, GoalData>, CashplanError> {
        self.data
            .read()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, GoalData>, CashplanError> {
        self.data
            .write()
            .map_err(|e| CashplanError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load goals and payments from disk
    pub fn load(&self) -> Result<(), CashplanError> {
        let file_data: GoalData = read_json(&self.path)?;
        *self.write_lock()? = file_data;
        Ok(())
    }

    /// Save goals and payments to disk
    pub fn save(&self) -> Result<(), CashplanError> {
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get a goal by ID
    pub fn get(&self, id: GoalId) -> Result<Option<Goal>, CashplanError> {
        Ok(self.read_lock()?.goals.iter().find(|g| g.id == id).cloned())
    }

    /// Get all goals in creation order
    pub fn get_all(&self) -> Result<Vec<Goal>, CashplanError> {
        Ok(self.read_lock()?.goals.clone())
    }

    /// Get goals that are still open, in creation order
    pub fn get_active(&self) -> Result<Vec<Goal>, CashplanError> {
        Ok(self
            .read_lock()?
            .goals
            .iter()
            .filter(|g| g.is_active())
            .cloned()
            .collect())
    }

    /// Get a goal by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Goal>, CashplanError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read_lock()?
            .goals
            .iter()
            .find(|g| g.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert a new goal at the end, or replace an existing one in place
    pub fn upsert(&self, goal: Goal) -> Result<(), CashplanError> {
        let mut data = self.write_lock()?;
        match data.goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => data.goals.push(goal),
        }
        Ok(())
    }

    /// Delete a goal along with its payment history
    pub fn delete(&self, id: GoalId) -> Result<bool, CashplanError> {
        let mut data = self.write_lock()?;
        let before = data.goals.len();
        data.goals.retain(|g| g.id != id);
        if data.goals.len() == before {
            return Ok(false);
        }
        data.payments.retain(|p| p.goal_id != id);
        Ok(true)
    }

    /// Check if a goal name is already taken
    pub fn name_exists(&self, name: &str, exclude_id: Option<GoalId>) -> Result<bool, CashplanError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read_lock()?
            .goals
            .iter()
            .any(|g| g.name.to_lowercase() == name_lower && Some(g.id) != exclude_id))
    }

    /// Record a payment
    pub fn add_payment(&self, payment: GoalPayment) -> Result<(), CashplanError> {
        let mut data = self.write_lock()?;
        if !data.goals.iter().any(|g| g.id == payment.goal_id) {
            return Err(CashplanError::goal_not_found(payment.goal_id.to_string()));
        }
        data.payments.push(payment);
        Ok(())
    }

    /// Payments toward a goal, newest first
    pub fn payments_for(&self, goal_id: GoalId) -> Result<Vec<GoalPayment>, CashplanError> {
        let mut payments: Vec<GoalPayment> = self
            .read_lock()?
            .payments
            .iter()
            .filter(|p| p.goal_id == goal_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(payments)
    }

    /// Sum of all payments toward a goal
    pub fn total_paid(&self, goal_id: GoalId) -> Result<Money, CashplanError> {
        Ok(self
            .read_lock()?
            .payments
            .iter()
            .filter(|p| p.goal_id == goal_id)
            .map(|p| p.amount)
            .sum())
    }

    /// Count goals
    pub fn count(&self) -> Result<usize, CashplanError> {
        Ok(self.read_lock()?.goals.len())
    }
}

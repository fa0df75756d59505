//! Audit entry data structures

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Bucket,
    Goal,
    GoalPayment,
    LedgerEntry,
    Settings,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bucket => "Bucket",
            Self::Goal => "Goal",
            Self::GoalPayment => "GoalPayment",
            Self::LedgerEntry => "LedgerEntry",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log entry
///
/// `before` is set for updates and deletes, `after` for creates and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human-readable label (bucket or goal name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn build(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: Option<Value>,
        after: Option<Value>,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        }
    }

    /// Entry for a newly created record
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::build(
            Operation::Create,
            entity_type,
            entity_id.into(),
            entity_name,
            None,
            serde_json::to_value(entity).ok(),
            None,
        )
    }

    /// Entry for a modified record
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self::build(
            Operation::Update,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
            diff_summary,
        )
    }

    /// Entry for a removed record
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::build(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(entity).ok(),
            None,
            None,
        )
    }

    /// One line for `cashplan audit`, plus the change summary when present
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(name) = &self.entity_name {
            let _ = write!(line, " ({})", name);
        }
        if let Some(diff) = &self.diff_summary {
            let _ = write!(line, "\n  Changes: {}", diff);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Goal, Money};

    #[test]
    fn test_entity_type_serializes_snake_case() {
        let json = serde_json::to_string(&EntityType::GoalPayment).unwrap();
        assert_eq!(json, "\"goal_payment\"");
        assert_eq!(EntityType::LedgerEntry.to_string(), "LedgerEntry");
    }

    #[test]
    fn test_create_entry_snapshots_bucket() {
        let bucket = Bucket::skim("Tithe", 10.0);
        let entry = AuditEntry::create(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &bucket,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        let after = entry.after.unwrap();
        assert_eq!(after["percent"], 10.0);
        assert_eq!(after["priority_pre"], true);
    }

    #[test]
    fn test_update_and_delete_entries() {
        let before = Goal::savings("Trip", Money::from_cents(50000));
        let mut after = before.clone();
        after.mark_cleared();

        let update = AuditEntry::update(
            EntityType::Goal,
            after.id.to_string(),
            None,
            &before,
            &after,
            Some("status: \"active\" -> \"cleared\"".into()),
        );
        assert!(update.before.is_some() && update.after.is_some());

        let delete = AuditEntry::delete(EntityType::Goal, after.id.to_string(), None, &after);
        assert_eq!(delete.operation, Operation::Delete);
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let bucket = Bucket::new("Operations", 60.0);
        let mut entry = AuditEntry::create(
            EntityType::Bucket,
            "bkt-12345678",
            Some("Operations".to_string()),
            &bucket,
        );
        entry.diff_summary = Some("percent: 50 -> 60".into());

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Bucket bkt-12345678 (Operations)"));
        assert!(formatted.contains("Changes: percent: 50 -> 60"));
    }
}

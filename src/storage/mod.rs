//! Storage layer for cashplan
//!
//! JSON file repositories with atomic writes, plus the audit log every
//! persisted mutation goes through.

pub mod buckets;
pub mod file_io;
pub mod goals;
pub mod ledger;
pub mod seed;

pub use buckets::BucketRepository;
pub use file_io::{read_document, read_json, write_document, write_json_atomic};
pub use goals::GoalRepository;
pub use ledger::LedgerRepository;
pub use seed::{BucketSpec, GoalSpec, PlanDocument};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::CashplanPaths;
use crate::error::CashplanError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CashplanPaths,
    pub buckets: BucketRepository,
    pub goals: GoalRepository,
    pub ledger: LedgerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: CashplanPaths) -> Result<Self, CashplanError> {
        paths.ensure_directories()?;

        Ok(Self {
            buckets: BucketRepository::new(paths.buckets_file()),
            goals: GoalRepository::new(paths.goals_file()),
            ledger: LedgerRepository::new(paths.ledger_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &CashplanPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), CashplanError> {
        self.buckets.load()?;
        self.goals.load()?;
        self.ledger.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), CashplanError> {
        self.buckets.save()?;
        self.goals.save()?;
        self.ledger.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has a settings file)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CashplanError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    ///
    /// When no summary is given, one is derived from the before/after snapshots.
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), CashplanError> {
        let diff_summary = diff_summary.or_else(|| {
            let before = serde_json::to_value(before).ok()?;
            let after = serde_json::to_value(after).ok()?;
            generate_diff(&before, &after)
        });
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CashplanError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), CashplanError> {
        self.audit.log_batch(entries)
    }
}

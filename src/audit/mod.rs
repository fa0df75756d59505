//! Audit log
//!
//! Every create, update and delete that reaches disk is recorded with
//! before/after snapshots in an append-only JSONL file (`audit.log`).
//!
//! - `AuditEntry`: one recorded operation
//! - `AuditLogger`: appends entries and reads them back
//! - `generate_diff`: top-level change summary between two snapshots
//!
//! Services go through the helpers on `Storage` (`log_create`, `log_update`,
//! `log_delete`) rather than building entries themselves.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

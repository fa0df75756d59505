//! Core data models for cashplan
//!
//! This module contains the plain records the engine reads and the caller
//! stores: buckets, goals, ledger entries and goal payments.

pub mod bucket;
pub mod goal;
pub mod ids;
pub mod ledger;
pub mod money;

pub use bucket::Bucket;
pub use goal::{Goal, GoalKind, GoalStatus};
pub use ids::{BucketId, GoalId, LedgerEntryId, PaymentId};
pub use ledger::{EntryKind, GoalPayment, LedgerEntry};
pub use money::Money;

//! cashplan - cash allocation and goal prioritization
//!
//! This library splits income across percentage-weighted buckets, ranks
//! debts and savings goals by a chosen strategy, and checks whether the
//! attack bucket can clear the top-ranked goal.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `engine`: Pure allocation, ranking, readiness and efficiency functions
//! - `models`: Core data models (money, buckets, goals, ledger entries)
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `storage`: JSON file storage layer and plan documents
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use cashplan::engine::{split_by_buckets, SplitOptions};
//! use cashplan::models::{Bucket, Money};
//!
//! let buckets = vec![Bucket::new("Operations", 60.0), Bucket::new("Attack", 40.0)];
//! let split = split_by_buckets(&buckets, Money::from_cents(100_000), SplitOptions::default())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{CashplanError, CashplanResult};

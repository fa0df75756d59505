//! Custom error types for cashplan
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Degenerate but expected states (zero
//! percent sums, a missing attack bucket, zero-cost goals) are never errors;
//! the engine reports them through its return values.

use thiserror::Error;

use crate::models::Money;

/// The main error type for cashplan operations
#[derive(Error, Debug)]
pub enum CashplanError {
    /// Caller passed something the engine refuses to coerce
    /// (non-positive total, negative percent, unknown strategy)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A withdrawal would drive a bucket negative
    #[error("Insufficient funds in bucket '{bucket}': need {needed}, have {available}")]
    InsufficientFunds {
        bucket: String,
        needed: Money,
        available: Money,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CashplanError {
    /// Create a "not found" error for buckets
    pub fn bucket_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bucket",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid-input rejection
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for CashplanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CashplanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for cashplan operations
pub type CashplanResult<T> = Result<T, CashplanError>;

//! Typed record identifiers
//!
//! Each record kind gets its own UUID newtype so a goal ID can never be
//! passed where a bucket ID is expected. IDs display as a short prefixed
//! form (`bkt-1a2b3c4d`) and parse from either the full UUID or the
//! prefixed full UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", Self::PREFIX, &simple[..8])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let raw = s.strip_prefix(Self::PREFIX).unwrap_or(s);
                Uuid::parse_str(raw).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a bucket
    BucketId,
    "bkt-"
);
define_id!(
    /// Identifies a payoff or savings goal
    GoalId,
    "goal-"
);
define_id!(LedgerEntryId, "led-");
define_id!(PaymentId, "pmt-");

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_short_display() {
        let id: BucketId = RAW.parse().unwrap();
        assert_eq!(id.to_string(), "bkt-550e8400");

        let goal = GoalId::new().to_string();
        assert!(goal.starts_with("goal-"));
        assert_eq!(goal.len(), "goal-".len() + 8);
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let bare: GoalId = RAW.parse().unwrap();
        let prefixed: GoalId = format!("goal-{}", RAW).parse().unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.as_uuid().to_string(), RAW);

        // The short display form is not enough to identify a record
        assert!("goal-550e8400".parse::<GoalId>().is_err());
        assert!("Operations".parse::<BucketId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let id: PaymentId = RAW.parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", RAW));
        assert!(!LedgerEntryId::new().as_uuid().is_nil());
    }
}

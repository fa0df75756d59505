//! Plan documents
//!
//! A hand-editable JSON or YAML file listing buckets and goals. Used to seed a
//! fresh data directory and to export the current plan. Amounts are written as
//! decimal strings ("1200.00") so the file reads naturally.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CashplanError;
use crate::models::{Bucket, Goal, GoalKind, GoalStatus, Money};

use super::file_io::{read_document, write_document};

/// One bucket line in a plan document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: String,
    pub percent: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub priority_pre: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default = "default_active", skip_serializing_if = "is_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn is_active(active: &bool) -> bool {
    *active
}

/// One goal line in a plan document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub name: String,
    #[serde(default)]
    pub kind: GoalKind,
    pub cost: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_relief: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<f64>,
    #[serde(default)]
    pub priority_weight: f64,
    #[serde(default, skip_serializing_if = "is_open")]
    pub status: GoalStatus,
}

fn is_open(status: &GoalStatus) -> bool {
    *status == GoalStatus::Active
}

/// Buckets and goals as written in a plan document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub buckets: Vec<BucketSpec>,
    #[serde(default)]
    pub goals: Vec<GoalSpec>,
}

fn parse_amount(field: &str, owner: &str, value: &str) -> Result<Money, CashplanError> {
    Money::parse(value).map_err(|e| {
        CashplanError::Validation(format!("{} of '{}': {}", field, owner, e))
    })
}

impl PlanDocument {
    /// Read a document; the format follows the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CashplanError> {
        read_document(path)
    }

    /// Write a document; the format follows the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CashplanError> {
        write_document(path, self)
    }

    /// Build a document from stored records
    pub fn from_records(buckets: &[Bucket], goals: &[Goal]) -> Self {
        Self {
            buckets: buckets
                .iter()
                .map(|b| BucketSpec {
                    name: b.name.clone(),
                    percent: b.percent,
                    priority_pre: b.priority_pre,
                    kind: Some(b.kind.clone()),
                    description: b.description.clone(),
                    active: b.active,
                })
                .collect(),
            goals: goals
                .iter()
                .map(|g| GoalSpec {
                    name: g.name.clone(),
                    kind: g.kind,
                    cost: g.cost.format_with_symbol(""),
                    monthly_relief: (!g.monthly_relief.is_zero())
                        .then(|| g.monthly_relief.format_with_symbol("")),
                    annual_rate: g.annual_rate,
                    priority_weight: g.priority_weight,
                    status: g.status,
                })
                .collect(),
        }
    }

    /// Turn the document into fresh, validated records
    ///
    /// Names must be unique (case-insensitive) within each list.
    pub fn to_records(&self) -> Result<(Vec<Bucket>, Vec<Goal>), CashplanError> {
        let mut buckets: Vec<Bucket> = Vec::with_capacity(self.buckets.len());
        for spec in &self.buckets {
            if buckets
                .iter()
                .any(|b| b.name.eq_ignore_ascii_case(spec.name.trim()))
            {
                return Err(CashplanError::Duplicate {
                    entity_type: "Bucket",
                    identifier: spec.name.clone(),
                });
            }

            let mut bucket = if spec.priority_pre {
                Bucket::skim(spec.name.trim(), spec.percent)
            } else {
                Bucket::new(spec.name.trim(), spec.percent)
            };
            if let Some(kind) = &spec.kind {
                bucket.kind = kind.clone();
            }
            bucket.description = spec.description.clone();
            bucket.active = spec.active;
            bucket
                .validate()
                .map_err(|e| CashplanError::Validation(e.to_string()))?;
            buckets.push(bucket);
        }

        let mut goals: Vec<Goal> = Vec::with_capacity(self.goals.len());
        for spec in &self.goals {
            if goals
                .iter()
                .any(|g| g.name.eq_ignore_ascii_case(spec.name.trim()))
            {
                return Err(CashplanError::Duplicate {
                    entity_type: "Goal",
                    identifier: spec.name.clone(),
                });
            }

            let cost = parse_amount("cost", &spec.name, &spec.cost)?;
            let mut goal = Goal::new(spec.name.trim(), spec.kind, cost);
            if let Some(relief) = &spec.monthly_relief {
                goal.monthly_relief = parse_amount("monthly_relief", &spec.name, relief)?;
            }
            goal.annual_rate = spec.annual_rate;
            goal.priority_weight = spec.priority_weight;
            goal.status = spec.status;
            goal.validate()
                .map_err(|e| CashplanError::Validation(e.to_string()))?;
            goals.push(goal);
        }

        Ok((buckets, goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLAN_YAML: &str = r#"
buckets:
  - name: Tithe
    percent: 10
    priority_pre: true
  - name: Operations
    percent: 60
  - name: Attack
    percent: 40
    kind: debt
goals:
  - name: Car loan
    cost: "4,800.00"
    monthly_relief: "320"
  - name: Emergency fund
    kind: savings
    cost: "1500"
    priority_weight: 2.5
"#;

    #[test]
    fn test_yaml_plan_to_records() {
        let doc: PlanDocument = serde_yaml::from_str(PLAN_YAML).unwrap();
        let (buckets, goals) = doc.to_records().unwrap();

        assert_eq!(buckets.len(), 3);
        assert!(buckets[0].priority_pre);
        assert_eq!(buckets[2].kind, "debt");
        assert_eq!(buckets[1].kind, "generic");

        assert_eq!(goals[0].cost.cents(), 480000);
        assert_eq!(goals[0].monthly_relief.cents(), 32000);
        assert_eq!(goals[0].kind, GoalKind::Debt);
        assert_eq!(goals[1].kind, GoalKind::Savings);
        assert_eq!(goals[1].priority_weight, 2.5);
    }

    #[test]
    fn test_duplicate_bucket_names_rejected() {
        let doc = PlanDocument {
            buckets: vec![
                BucketSpec {
                    name: "Ops".into(),
                    percent: 50.0,
                    priority_pre: false,
                    kind: None,
                    description: String::new(),
                    active: true,
                },
                BucketSpec {
                    name: "ops".into(),
                    percent: 50.0,
                    priority_pre: false,
                    kind: None,
                    description: String::new(),
                    active: true,
                },
            ],
            goals: Vec::new(),
        };

        assert!(matches!(
            doc.to_records(),
            Err(CashplanError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_bad_cost_is_validation_error() {
        let doc: PlanDocument =
            serde_yaml::from_str("goals:\n  - name: Loan\n    cost: lots\n").unwrap();
        assert!(doc.to_records().unwrap_err().is_validation());
    }

    #[test]
    fn test_negative_percent_rejected() {
        let doc: PlanDocument =
            serde_yaml::from_str("buckets:\n  - name: Bad\n    percent: -5\n").unwrap();
        assert!(doc.to_records().unwrap_err().is_validation());
    }

    #[test]
    fn test_export_then_seed_keeps_plan() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.yaml");

        let buckets = vec![Bucket::skim("Tithe", 10.0), Bucket::new("Ops", 90.0)];
        let goals = vec![Goal::debt(
            "Card",
            Money::from_cents(125050),
            Money::from_cents(4000),
        )];
        PlanDocument::from_records(&buckets, &goals).save(&path).unwrap();

        let (seeded_buckets, seeded_goals) = PlanDocument::load(&path).unwrap().to_records().unwrap();
        assert_eq!(seeded_buckets[0].name, "Tithe");
        assert!(seeded_buckets[0].priority_pre);
        assert_eq!(seeded_goals[0].cost.cents(), 125050);
        assert_eq!(seeded_goals[0].monthly_relief.cents(), 4000);
    }

    #[test]
    fn test_export_keeps_inactive_buckets_and_cleared_goals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.json");

        let mut retired = Bucket::new("Retired", 20.0);
        retired.deactivate();
        let buckets = vec![Bucket::new("Ops", 80.0), retired];

        let mut paid_off = Goal::debt("Phone", Money::from_cents(30000), Money::from_cents(2500));
        paid_off.mark_cleared();
        let goals = vec![paid_off, Goal::savings("Laptop", Money::from_units(1200))];

        PlanDocument::from_records(&buckets, &goals).save(&path).unwrap();
        let (buckets, goals) = PlanDocument::load(&path).unwrap().to_records().unwrap();

        assert!(buckets[0].active);
        assert!(!buckets[1].active);
        assert_eq!(goals[0].status, GoalStatus::Cleared);
        assert!(goals[1].is_active());
    }

    #[test]
    fn test_hand_written_plan_defaults_to_active() {
        let doc: PlanDocument = serde_yaml::from_str(
            "buckets:\n  - name: Ops\n    percent: 100\n  - name: Old\n    percent: 5\n    active: false\ngoals:\n  - name: Card\n    cost: \"10\"\n    status: cleared\n",
        )
        .unwrap();
        let (buckets, goals) = doc.to_records().unwrap();

        assert!(buckets[0].active);
        assert!(!buckets[1].active);
        assert_eq!(goals[0].status, GoalStatus::Cleared);
    }
}

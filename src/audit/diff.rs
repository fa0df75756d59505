//! Change summaries for audit entries

use serde_json::Value;

/// Summarize top-level field changes between two snapshots
///
/// Returns `None` when nothing changed. Fields are compared in the order they
/// appear in `before`, then fields only present in `after`. `updated_at` is
/// left out since every edit touches it.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj.iter().filter(|(k, _)| !is_ignored(k)) {
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
                }
            }

            for (key, after_val) in after_obj.iter().filter(|(k, _)| !is_ignored(k)) {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn is_ignored(key: &str) -> bool {
    key == "updated_at"
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Money};
    use serde_json::json;

    #[test]
    fn test_bucket_edit_summary() {
        let before = Bucket::new("Ops", 50.0);
        let mut after = before.clone();
        after.set_percent(60.0);
        after.apply_delta(Money::from_cents(1250)).unwrap();

        let diff = generate_diff(
            &serde_json::to_value(&before).unwrap(),
            &serde_json::to_value(&after).unwrap(),
        )
        .unwrap();

        assert!(diff.contains("percent: 50.0 -> 60.0"));
        assert!(diff.contains("balance: 0 -> 1250"));
        assert!(!diff.contains("updated_at"));
        assert!(!diff.contains("name"));
    }

    #[test]
    fn test_only_timestamp_changed_is_no_diff() {
        let before = json!({"name": "Ops", "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"name": "Ops", "updated_at": "2025-02-01T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"annual_rate": 19.9});
        let after = json!({"notes": "refinanced"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(
            diff,
            "annual_rate: 19.9 -> (removed), notes: (added) -> \"refinanced\""
        );
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).unwrap(), "1 -> 2");
        assert!(generate_diff(&json!("x"), &json!("x")).is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");

        let long = format_value(&json!("é".repeat(60)));
        assert!(long.ends_with("...\""));
    }
}

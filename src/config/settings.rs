//! User settings for cashplan
//!
//! Manages user preferences: which split policy the allocator runs, what it
//! does with rounding drift, the default ranking strategy and the attack
//! bucket the readiness check watches. The declared monthly income and
//! expense feed the summary report.

use serde::{Deserialize, Serialize};

use super::paths::CashplanPaths;
use crate::engine::{ResidualPolicy, SplitOptions, SplitPolicy, Strategy};
use crate::error::CashplanError;
use crate::models::Money;
use crate::storage::{read_json, write_json_atomic};

/// User settings for cashplan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// How daily income is split across buckets
    #[serde(default)]
    pub split_policy: SplitPolicy,

    /// What happens to per-bucket rounding drift
    #[serde(default)]
    pub residual_policy: ResidualPolicy,

    /// Strategy used when a command does not name one
    #[serde(default)]
    pub default_strategy: Strategy,

    /// Name of the bucket that accumulates money to attack goals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_bucket: Option<String>,

    /// Allow expenses and transfers to drive a bucket negative
    #[serde(default)]
    pub allow_negative_balances: bool,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Declared monthly income, in cents
    #[serde(default)]
    pub monthly_income: Money,

    /// Declared monthly expense, in cents
    #[serde(default)]
    pub monthly_expense: Money,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            split_policy: SplitPolicy::default(),
            residual_policy: ResidualPolicy::default(),
            default_strategy: Strategy::default(),
            attack_bucket: None,
            allow_negative_balances: false,
            currency_symbol: default_currency(),
            monthly_income: Money::zero(),
            monthly_expense: Money::zero(),
        }
    }
}

impl Settings {
    /// Allocator options derived from these settings
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions::new(self.split_policy, self.residual_policy)
    }

    /// Keys accepted by [`Settings::set`]
    pub const KEYS: [&'static str; 8] = [
        "split_policy",
        "residual_policy",
        "default_strategy",
        "attack_bucket",
        "allow_negative_balances",
        "currency_symbol",
        "monthly_income",
        "monthly_expense",
    ];

    /// Change one setting from its textual form
    ///
    /// `attack_bucket` is cleared with an empty value or `none`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CashplanError> {
        let value = value.trim();
        let invalid = |expected: &str| {
            CashplanError::InvalidInput(format!(
                "invalid value '{}' for {}: expected {}",
                value, key, expected
            ))
        };

        match key {
            "split_policy" => {
                self.split_policy =
                    SplitPolicy::parse(value).ok_or_else(|| invalid("normalize_all or priority_tier"))?;
            }
            "residual_policy" => {
                self.residual_policy =
                    ResidualPolicy::parse(value).ok_or_else(|| invalid("keep or largest_share"))?;
            }
            "default_strategy" => {
                self.default_strategy = value.parse()?;
            }
            "attack_bucket" => {
                self.attack_bucket = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "allow_negative_balances" => {
                self.allow_negative_balances = match value.to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid("true or false")),
                };
            }
            "currency_symbol" => {
                self.currency_symbol = value.to_string();
            }
            "monthly_income" | "monthly_expense" => {
                let amount = Money::parse(value)
                    .ok()
                    .filter(|m| !m.is_negative())
                    .ok_or_else(|| invalid("a non-negative amount"))?;
                if key == "monthly_income" {
                    self.monthly_income = amount;
                } else {
                    self.monthly_expense = amount;
                }
            }
            _ => {
                return Err(CashplanError::Config(format!(
                    "unknown setting '{}'; known settings: {}",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }

        Ok(())
    }

    /// Load `config.json`, or defaults when it does not exist yet
    ///
    /// Nothing is written here; `cashplan init` and `config set` persist.
    pub fn load_or_create(paths: &CashplanPaths) -> Result<Self, CashplanError> {
        read_json(paths.settings_file()).map_err(|e| {
            CashplanError::Config(format!("Failed to load settings: {}", e))
        })
    }

    /// Write `config.json` atomically
    pub fn save(&self, paths: &CashplanPaths) -> Result<(), CashplanError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.split_policy, SplitPolicy::PriorityTier);
        assert_eq!(settings.residual_policy, ResidualPolicy::Keep);
        assert_eq!(settings.default_strategy, Strategy::Avalanche);
        assert!(settings.attack_bucket.is_none());
        assert!(!settings.allow_negative_balances);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashplanPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.split_policy = SplitPolicy::NormalizeAll;
        settings.residual_policy = ResidualPolicy::LargestShare;
        settings.attack_bucket = Some("Attack".into());

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.split_policy, SplitPolicy::NormalizeAll);
        assert_eq!(
            loaded.split_options(),
            SplitOptions::new(SplitPolicy::NormalizeAll, ResidualPolicy::LargestShare)
        );
        assert_eq!(loaded.attack_bucket.as_deref(), Some("Attack"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"split_policy": "normalize_all"}"#).unwrap();
        assert_eq!(settings.split_policy, SplitPolicy::NormalizeAll);
        assert_eq!(settings.default_strategy, Strategy::Avalanche);
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.monthly_income.is_zero());
    }

    #[test]
    fn test_set_from_text() {
        let mut settings = Settings::default();
        settings.set("split_policy", "normalize-all").unwrap();
        settings.set("residual_policy", "largest_share").unwrap();
        settings.set("default_strategy", "Snowball").unwrap();
        settings.set("attack_bucket", "Attack").unwrap();
        settings.set("allow_negative_balances", "yes").unwrap();

        assert_eq!(settings.split_policy, SplitPolicy::NormalizeAll);
        assert_eq!(settings.residual_policy, ResidualPolicy::LargestShare);
        assert_eq!(settings.default_strategy, Strategy::Snowball);
        assert_eq!(settings.attack_bucket.as_deref(), Some("Attack"));
        assert!(settings.allow_negative_balances);

        settings.set("attack_bucket", "none").unwrap();
        assert!(settings.attack_bucket.is_none());

        settings.set("monthly_income", "4,500").unwrap();
        settings.set("monthly_expense", "$3200.50").unwrap();
        assert_eq!(settings.monthly_income, Money::from_units(4500));
        assert_eq!(settings.monthly_expense.cents(), 320050);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set("split_policy", "evenly").unwrap_err().is_invalid_input());
        assert!(settings.set("default_strategy", "random").unwrap_err().is_invalid_input());
        assert!(settings.set("monthly_income", "-10").unwrap_err().is_invalid_input());
        assert!(settings.set("monthly_expense", "lots").unwrap_err().is_invalid_input());
        assert!(matches!(
            settings.set("colour", "blue"),
            Err(CashplanError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result: Result<Settings, _> =
            serde_json::from_str(r#"{"default_strategy": "random"}"#);
        assert!(result.is_err());
    }
}

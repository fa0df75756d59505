//! Money amounts
//!
//! Every balance, cost and share is an `i64` count of cents. Floats appear
//! only while computing a proportional share, and the result is rounded back
//! to whole cents immediately.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest magnitude `Money::parse` accepts: one trillion currency units
pub const MAX_PARSED_CENTS: i64 = 100_000_000_000_000;

/// A currency amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// # Examples
    /// ```
    /// use cashplan::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `Money::from_units(4800)` is 4800.00
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Negative amounts become zero
    pub const fn clamp_zero(&self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            *self
        }
    }

    /// `None` when the sum does not fit in an `i64`
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// The amount in currency units as a float, for ratios only
    pub fn as_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The part of this amount that `weight` carries out of `total_weight`,
    /// rounded half-up to the cent
    ///
    /// A non-positive `total_weight` yields zero.
    ///
    /// ```
    /// use cashplan::models::Money;
    /// assert_eq!(Money::from_cents(1001).proportion(1.0, 2.0).cents(), 501);
    /// ```
    pub fn proportion(&self, weight: f64, total_weight: f64) -> Self {
        if total_weight <= 0.0 {
            return Self::zero();
        }
        let raw = self.0 as f64 * weight / total_weight;
        // 500.4999999 must round like 500.5
        let snapped = (raw * 1e6).round() / 1e6;
        Self(snapped.round() as i64)
    }

    /// `percent` (0..100 scale) of this amount, rounded half-up to the cent
    pub fn percent_of(&self, percent: f64) -> Self {
        self.proportion(percent, 100.0)
    }

    /// Parse a user-entered amount
    ///
    /// Accepts an optional leading `-`, an optional `$`, digit group
    /// separators (`,` or `_`) and at most two decimal places:
    /// `"4800"`, `"1,250.5"`, `"-$10.05"`. Magnitudes above
    /// [`MAX_PARSED_CENTS`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();
        if input.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let digits: String = rest.chars().filter(|c| !matches!(c, ',' | '_')).collect();

        let invalid = || MoneyParseError::InvalidFormat(input.to_string());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(input.to_string()));
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            // digits only, so a failure here is overflow
            whole
                .parse()
                .map_err(|_| MoneyParseError::TooLarge(input.to_string()))?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| MoneyParseError::TooLarge(input.to_string()))?;
        if total > MAX_PARSED_CENTS {
            return Err(MoneyParseError::TooLarge(input.to_string()));
        }
        Ok(Self(if negative { -total } else { total }))
    }

    /// Render with the given currency symbol; an empty symbol gives a bare
    /// number such as `1250.00`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, cents / 100, cents % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

/// Why an amount could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "amount is empty"),
            Self::InvalidFormat(s) => write!(f, "not an amount: {}", s),
            Self::TooPrecise(s) => write!(f, "more than two decimal places: {}", s),
            Self::TooLarge(s) => write!(f, "amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_symbol() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::from_units(4800).format_with_symbol(""), "4800.00");
        assert_eq!(Money::from_cents(-123456).format_with_symbol("€"), "-€1234.56");
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(Money::parse("4800").unwrap(), Money::from_units(4800));
        assert_eq!(Money::parse("1,250.5").unwrap().cents(), 125050);
        assert_eq!(Money::parse("-$10.05").unwrap().cents(), -1005);
        assert_eq!(Money::parse("10_000").unwrap().cents(), 1_000_000);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse(" 3. ").unwrap().cents(), 300);
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(Money::parse("  "), Err(MoneyParseError::Empty));
        assert!(matches!(Money::parse("12.345"), Err(MoneyParseError::TooPrecise(_))));
        assert!(matches!(Money::parse("1.2.3"), Err(MoneyParseError::InvalidFormat(_))));
        assert!(matches!(Money::parse("ten"), Err(MoneyParseError::InvalidFormat(_))));
        assert!(matches!(Money::parse("$"), Err(MoneyParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_caps_magnitude() {
        assert_eq!(
            Money::parse("1,000,000,000,000").unwrap().cents(),
            MAX_PARSED_CENTS
        );
        assert!(matches!(
            Money::parse("1000000000000.01"),
            Err(MoneyParseError::TooLarge(_))
        ));
        assert!(matches!(
            Money::parse("-92233720368547758.07"),
            Err(MoneyParseError::TooLarge(_))
        ));
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::TooLarge(_))
        ));
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // 10.01 * 50% = 5.005
        assert_eq!(Money::from_cents(1001).percent_of(50.0).cents(), 501);
        assert_eq!(Money::from_cents(10000).percent_of(33.33).cents(), 3333);
        // 0.10 * 15% = 0.015
        assert_eq!(Money::from_cents(10).percent_of(15.0).cents(), 2);
    }

    #[test]
    fn test_proportion() {
        assert!(Money::from_cents(1000).proportion(1.0, 0.0).is_zero());
        assert_eq!(Money::from_cents(1000).proportion(1.0, 4.0).cents(), 250);
        assert_eq!(Money::from_units(900).proportion(60.0, 90.0).cents(), 60000);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let mut balance = Money::from_units(10);
        balance -= Money::from_cents(1250);
        assert!(balance.is_negative());
        assert!(balance.clamp_zero().is_zero());
        assert_eq!((-balance).cents(), 250);

        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(5).checked_add(Money::from_cents(-7)),
            Some(Money::from_cents(-2))
        );

        let total: Money = [100, 200, 300].into_iter().map(Money::from_cents).sum();
        assert_eq!(total, Money::from_units(6));
    }

    #[test]
    fn test_serializes_as_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1050)).unwrap(), "1050");
        let back: Money = serde_json::from_str("-20").unwrap();
        assert_eq!(back.cents(), -20);
    }
}

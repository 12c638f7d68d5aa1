//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, the granularity of the demand forecast engine.
///
/// Serialized as "YYYY-MM" so it can key the override maps stored on a
/// replenishment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("month is in 1..=12")
    }

    /// Number of calendar days in the month
    pub fn days_in_month(&self) -> u32 {
        let next = self.add_months(1);
        next.first_day()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    /// The month `offset` months after this one
    pub fn add_months(&self, offset: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + offset as i64;
        Self {
            year: (zero_based.div_euclid(12)) as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        }
    }

    /// The month `offset` months before this one
    pub fn sub_months(&self, offset: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) - offset as i64;
        Self {
            year: (zero_based.div_euclid(12)) as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or("expected YYYY-MM")?;
        let year: i32 = year.parse().map_err(|_| "invalid year")?;
        let month: u32 = month.parse().map_err(|_| "invalid month")?;
        YearMonth::new(year, month).ok_or("month must be between 01 and 12")
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Stock-cover risk tier derived from turnover days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classify days of stock cover; fewer days of cover means higher
    /// stock-out risk. Thresholds at 15 and 45 days.
    pub fn from_turnover_days(days: f64) -> Self {
        if days < 15.0 {
            RiskTier::High
        } else if days <= 45.0 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Lenient numeric coercion for operator-entered quantity values.
///
/// Override maps and similar JSON blobs may carry quantities as numbers
/// or as strings; anything malformed coerces to 0 (absent demand is zero
/// demand). This is the single place that rule lives.
pub fn coerce_qty(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
            .unwrap_or(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_roundtrip() {
        let ym: YearMonth = "2026-03".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2026, 3).unwrap());
        assert_eq!(ym.to_string(), "2026-03");
    }

    #[test]
    fn year_month_arithmetic_crosses_year_boundary() {
        let ym = YearMonth::new(2025, 11).unwrap();
        assert_eq!(ym.add_months(3), YearMonth::new(2026, 2).unwrap());
        assert_eq!(ym.sub_months(11), YearMonth::new(2024, 12).unwrap());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2025, 7).unwrap().days_in_month(), 31);
    }

    #[test]
    fn coerce_qty_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_qty(&serde_json::json!(42)), 42);
        assert_eq!(coerce_qty(&serde_json::json!(41.6)), 42);
        assert_eq!(coerce_qty(&serde_json::json!(" 17 ")), 17);
        assert_eq!(coerce_qty(&serde_json::json!("not a number")), 0);
        assert_eq!(coerce_qty(&serde_json::Value::Null), 0);
        assert_eq!(coerce_qty(&serde_json::json!([1, 2])), 0);
    }
}

//! Rebalance frequency tokens and period bucketing

use crate::error::CppiError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often the risky weight may be recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RebalanceFrequency {
    /// Every trading day
    Daily,
    /// First trading day of each ISO (Monday-Sunday) week
    Weekly,
    /// First trading day of each calendar month
    MonthEnd,
}

impl RebalanceFrequency {
    /// Bucket key of the period a date falls in
    ///
    /// Two dates share a key exactly when they fall in the same period.
    pub fn bucket(&self, date: NaiveDate) -> (i32, u32) {
        match self {
            RebalanceFrequency::Daily => (date.year(), date.ordinal()),
            RebalanceFrequency::Weekly => {
                let iso = date.iso_week();
                (iso.year(), iso.week())
            }
            RebalanceFrequency::MonthEnd => (date.year(), date.month()),
        }
    }

    /// Canonical short token
    pub fn token(&self) -> &'static str {
        match self {
            RebalanceFrequency::Daily => "D",
            RebalanceFrequency::Weekly => "W",
            RebalanceFrequency::MonthEnd => "ME",
        }
    }
}

impl FromStr for RebalanceFrequency {
    type Err = CppiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(RebalanceFrequency::Daily),
            "w" | "w-sun" | "weekly" => Ok(RebalanceFrequency::Weekly),
            "me" | "m" | "bme" | "month-end" | "monthly" => Ok(RebalanceFrequency::MonthEnd),
            other => Err(CppiError::InvalidConfiguration(format!(
                "unsupported rebalance frequency '{}' (expected daily, weekly or month-end)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for RebalanceFrequency {
    type Error = CppiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RebalanceFrequency> for String {
    fn from(freq: RebalanceFrequency) -> Self {
        freq.token().to_string()
    }
}

impl fmt::Display for RebalanceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("D".parse::<RebalanceFrequency>().unwrap(), RebalanceFrequency::Daily);
        assert_eq!("weekly".parse::<RebalanceFrequency>().unwrap(), RebalanceFrequency::Weekly);
        assert_eq!("ME".parse::<RebalanceFrequency>().unwrap(), RebalanceFrequency::MonthEnd);
        assert_eq!(" Month-End ".parse::<RebalanceFrequency>().unwrap(), RebalanceFrequency::MonthEnd);

        let err = "Q".parse::<RebalanceFrequency>().unwrap_err();
        assert!(matches!(err, CppiError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_weekly_bucket_spans_year_boundary() {
        // 2024-12-30 (Mon) and 2025-01-03 (Fri) are in ISO week 2025-W01
        let mon = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let fri = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(
            RebalanceFrequency::Weekly.bucket(mon),
            RebalanceFrequency::Weekly.bucket(fri)
        );
        assert_ne!(
            RebalanceFrequency::MonthEnd.bucket(mon),
            RebalanceFrequency::MonthEnd.bucket(fri)
        );
    }

    #[test]
    fn test_serde_round_trip_uses_token() {
        let json = serde_json::to_string(&RebalanceFrequency::MonthEnd).unwrap();
        assert_eq!(json, "\"ME\"");
        let parsed: RebalanceFrequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, RebalanceFrequency::Weekly);
        assert!(serde_json::from_str::<RebalanceFrequency>("\"yearly\"").is_err());
    }
}

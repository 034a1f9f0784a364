//! Series data structures

use crate::error::{CppiError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single-column series indexed by trading date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// Adjusted close prices
pub type PriceSeries = TimeSeries;

/// Fractional period-over-period returns
pub type ReturnSeries = TimeSeries;

/// Cumulative wealth (NAV) path
pub type ValueSeries = TimeSeries;

impl TimeSeries {
    /// Build a series, checking lengths match and dates strictly increase
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(CppiError::MisalignedData(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        check_strictly_increasing(&dates)?;
        Ok(Self { dates, values })
    }

    pub fn empty() -> Self {
        Self { dates: Vec::new(), values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Period-over-period percentage change
    ///
    /// The first observation has no predecessor and is dropped, so the
    /// result is one shorter than `self` (empty for fewer than two points).
    pub fn pct_change(&self) -> ReturnSeries {
        if self.values.len() < 2 {
            return Self::empty();
        }
        let values = self
            .values
            .windows(2)
            .map(|w| w[1] / w[0] - 1.0)
            .collect();
        Self {
            dates: self.dates[1..].to_vec(),
            values,
        }
    }
}

/// Aligned daily returns of a risky and a safe asset
///
/// Every date carries both returns, dates strictly increase and no return
/// is NaN or infinite. The fields are private so the invariant holds for
/// every value the engine sees.
#[derive(Debug, Clone, PartialEq)]
pub struct DualReturnSeries {
    dates: Vec<NaiveDate>,
    risky: Vec<f64>,
    safe: Vec<f64>,
}

impl DualReturnSeries {
    /// Build from pre-aligned columns
    pub fn new(dates: Vec<NaiveDate>, risky: Vec<f64>, safe: Vec<f64>) -> Result<Self> {
        if risky.len() != dates.len() || safe.len() != dates.len() {
            return Err(CppiError::MisalignedData(format!(
                "{} dates, {} risky returns, {} safe returns",
                dates.len(),
                risky.len(),
                safe.len()
            )));
        }
        check_strictly_increasing(&dates)?;

        for (i, date) in dates.iter().enumerate() {
            if !risky[i].is_finite() || !safe[i].is_finite() {
                return Err(CppiError::MisalignedData(format!(
                    "missing asset return on {} (risky={}, safe={})",
                    date, risky[i], safe[i]
                )));
            }
        }

        Ok(Self { dates, risky, safe })
    }

    /// Build from `(date, risky, safe)` rows
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64, f64)>,
    {
        let mut dates = Vec::new();
        let mut risky = Vec::new();
        let mut safe = Vec::new();
        for (date, r, s) in rows {
            dates.push(date);
            risky.push(r);
            safe.push(s);
        }
        Self::new(dates, risky, safe)
    }

    /// Inner-join two single-asset series on date
    ///
    /// Dates present in only one series, or where either return is not
    /// finite, are dropped.
    pub fn align(risky: &ReturnSeries, safe: &ReturnSeries) -> Result<Self> {
        let safe_by_date: HashMap<NaiveDate, f64> = safe.iter().collect();

        let mut dates = Vec::with_capacity(risky.len().min(safe.len()));
        let mut risky_out = Vec::with_capacity(dates.capacity());
        let mut safe_out = Vec::with_capacity(dates.capacity());

        for (date, r) in risky.iter() {
            if let Some(&s) = safe_by_date.get(&date) {
                if r.is_finite() && s.is_finite() {
                    dates.push(date);
                    risky_out.push(r);
                    safe_out.push(s);
                }
            }
        }

        let dropped = risky.len().max(safe.len()) - dates.len();
        if dropped > 0 {
            info!(
                "Aligned {} common dates, dropped {} unmatched or missing rows",
                dates.len(),
                dropped
            );
        } else {
            debug!("Aligned {} dates with no gaps", dates.len());
        }

        Self::new(dates, risky_out, safe_out)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn risky(&self) -> &[f64] {
        &self.risky
    }

    pub fn safe(&self) -> &[f64] {
        &self.safe
    }

    /// Iterate `(date, risky, safe)` in chronological order
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.risky.iter().zip(self.safe.iter()))
            .map(|(&d, (&r, &s))| (d, r, s))
    }
}

fn check_strictly_increasing(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(CppiError::MisalignedData(format!(
                "dates must strictly increase: {} followed by {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_pct_change_drops_first() {
        let prices = TimeSeries::new(vec![d(2), d(3), d(4)], vec![100.0, 110.0, 99.0]).unwrap();
        let returns = prices.pct_change();

        assert_eq!(returns.dates, vec![d(3), d(4)]);
        assert!((returns.values[0] - 0.10).abs() < 1e-12);
        assert!((returns.values[1] - (-0.10)).abs() < 1e-12);

        let single = TimeSeries::new(vec![d(2)], vec![100.0]).unwrap();
        assert!(single.pct_change().is_empty());
    }

    #[test]
    fn test_unordered_dates_rejected() {
        let err = TimeSeries::new(vec![d(3), d(2)], vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, CppiError::MisalignedData(_)));

        let dup = DualReturnSeries::new(vec![d(2), d(2)], vec![0.0; 2], vec![0.0; 2]);
        assert!(matches!(dup, Err(CppiError::MisalignedData(_))));
    }

    #[test]
    fn test_missing_asset_return_rejected() {
        let result = DualReturnSeries::new(vec![d(2), d(3)], vec![0.01, f64::NAN], vec![0.0, 0.0]);
        assert!(matches!(result, Err(CppiError::MisalignedData(_))));

        let short = DualReturnSeries::new(vec![d(2), d(3)], vec![0.01], vec![0.0, 0.0]);
        assert!(matches!(short, Err(CppiError::MisalignedData(_))));
    }

    #[test]
    fn test_align_inner_join() {
        let risky = TimeSeries::new(vec![d(2), d(3), d(4), d(5)], vec![0.01, 0.02, f64::NAN, 0.04]).unwrap();
        let safe = TimeSeries::new(vec![d(3), d(4), d(5), d(8)], vec![0.001, 0.002, 0.003, 0.004]).unwrap();

        let aligned = DualReturnSeries::align(&risky, &safe).unwrap();
        assert_eq!(aligned.dates(), &[d(3), d(5)]);
        assert_eq!(aligned.risky(), &[0.02, 0.04]);
        assert_eq!(aligned.safe(), &[0.001, 0.003]);
    }
}

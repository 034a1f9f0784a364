//! Rebalance scheduling
//!
//! The schedule is built once per run and only answers membership queries
//! while the simulation iterates.

mod frequency;

pub use frequency::RebalanceFrequency;

use crate::error::Result;
use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;

/// Immutable set of dates on which the risky weight is recomputed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebalanceSchedule {
    dates: HashSet<NaiveDate>,
}

impl RebalanceSchedule {
    /// Flag the first observed date of every period bucket
    pub fn build(dates: &[NaiveDate], frequency: RebalanceFrequency) -> Self {
        let mut seen_buckets = HashSet::new();
        let rebalance_dates: HashSet<NaiveDate> = dates
            .iter()
            .copied()
            .filter(|date| seen_buckets.insert(frequency.bucket(*date)))
            .collect();

        debug!(
            "Rebalance schedule ({}): {} of {} dates",
            frequency,
            rebalance_dates.len(),
            dates.len()
        );

        Self { dates: rebalance_dates }
    }

    #[inline]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Rebalance dates in chronological order
    pub fn sorted_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.dates.iter().copied().collect();
        dates.sort_unstable();
        dates
    }
}

/// Parse a frequency token and build the schedule for `dates`
pub fn rebalance_dates(dates: &[NaiveDate], frequency: &str) -> Result<RebalanceSchedule> {
    let frequency: RebalanceFrequency = frequency.parse()?;
    Ok(RebalanceSchedule::build(dates, frequency))
}

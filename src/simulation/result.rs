//! Simulation output records

use super::FloorPolicy;
use crate::returns::{ReturnSeries, TimeSeries, ValueSeries};
use chrono::NaiveDate;
use serde::Serialize;

/// One recorded step of a simulation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulationRow {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub risky_weight: f64,
    pub floor_level: f64,
    pub rebalanced: bool,
}

/// Full path of a completed simulation
///
/// All vectors have the length of the input series, in input order.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub policy: FloorPolicy,
    pub dates: Vec<NaiveDate>,
    /// NAV after each step's return
    pub values: Vec<f64>,
    /// Risky weight in force during each step
    pub weights: Vec<f64>,
    /// Floor level in force during each step
    pub floors: Vec<f64>,
    /// Whether each step was a rebalance date
    pub rebalanced: Vec<bool>,
    pub rebalance_count: usize,
    pub ratchet_count: usize,
}

impl SimulationResult {
    pub(crate) fn with_capacity(policy: FloorPolicy, n: usize) -> Self {
        Self {
            policy,
            dates: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
            floors: Vec::with_capacity(n),
            rebalanced: Vec::with_capacity(n),
            rebalance_count: 0,
            ratchet_count: 0,
        }
    }

    pub(crate) fn push(&mut self, row: SimulationRow) {
        self.dates.push(row.date);
        self.values.push(row.portfolio_value);
        self.weights.push(row.risky_weight);
        self.floors.push(row.floor_level);
        self.rebalanced.push(row.rebalanced);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cumulative value path aligned to the input dates
    pub fn value_series(&self) -> ValueSeries {
        TimeSeries {
            dates: self.dates.clone(),
            values: self.values.clone(),
        }
    }

    /// Per-step portfolio returns, including the first step from unit NAV
    pub fn returns(&self) -> ReturnSeries {
        let mut prev = super::INITIAL_PORTFOLIO_VALUE;
        let values = self
            .values
            .iter()
            .map(|&v| {
                let r = v / prev - 1.0;
                prev = v;
                r
            })
            .collect();
        TimeSeries {
            dates: self.dates.clone(),
            values,
        }
    }

    /// NAV after the last step (initial NAV for an empty run)
    pub fn final_value(&self) -> f64 {
        self.values
            .last()
            .copied()
            .unwrap_or(super::INITIAL_PORTFOLIO_VALUE)
    }

    pub fn rows(&self) -> impl Iterator<Item = SimulationRow> + '_ {
        (0..self.len()).map(move |i| SimulationRow {
            date: self.dates[i],
            portfolio_value: self.values[i],
            risky_weight: self.weights[i],
            floor_level: self.floors[i],
            rebalanced: self.rebalanced[i],
        })
    }

    /// Split into the `(value_series, weight_sequence)` pair
    pub fn into_parts(self) -> (ValueSeries, Vec<f64>) {
        (
            TimeSeries {
                dates: self.dates,
                values: self.values,
            },
            self.weights,
        )
    }
}

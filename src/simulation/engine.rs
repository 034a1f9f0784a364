//! CPPI simulation engine
//!
//! A single forward pass over the aligned return series. Each step:
//! 1. On a rebalance date, reset the risky weight to `m * cushion`, clamped to [0, 1]
//! 2. Under the dynamic policy, ratchet the floor while fully invested
//! 3. Grow NAV by the weighted asset returns
//! 4. Record NAV, weight and floor

use super::result::{SimulationResult, SimulationRow};
use super::state::SimulationState;
use super::INITIAL_PORTFOLIO_VALUE;
use crate::config::{validate_floor, validate_multiplier};
use crate::error::Result;
use crate::returns::DualReturnSeries;
use crate::schedule::RebalanceSchedule;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the floor evolves over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Floor fixed at a fraction of initial NAV
    Static,
    /// Floor reset to a fraction of current NAV whenever fully invested
    Dynamic,
}

impl fmt::Display for FloorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorPolicy::Static => f.write_str("static"),
            FloorPolicy::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CppiConfig {
    /// Protected fraction of NAV, in (0, 1]
    pub floor: f64,
    /// Cushion multiplier, > 0
    pub multiplier: f64,
    pub floor_policy: FloorPolicy,
}

impl CppiConfig {
    pub fn validate(&self) -> Result<()> {
        validate_floor(self.floor)?;
        validate_multiplier(self.multiplier)
    }
}

/// Runs CPPI simulations for one validated configuration
#[derive(Debug, Clone)]
pub struct CppiEngine {
    config: CppiConfig,
}

impl CppiEngine {
    pub fn new(config: CppiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Simulate over `returns`, recomputing weights on `schedule` dates
    pub fn run(&self, returns: &DualReturnSeries, schedule: &RebalanceSchedule) -> SimulationResult {
        let CppiConfig { floor, multiplier, floor_policy } = self.config;

        let mut state = SimulationState::new(INITIAL_PORTFOLIO_VALUE, floor);
        let mut result = SimulationResult::with_capacity(floor_policy, returns.len());
        let mut bankrupt_logged = false;

        for (date, risky_return, safe_return) in returns.rows() {
            let rebalanced = schedule.contains(&date);
            if rebalanced {
                result.rebalance_count += 1;
                if !state.rebalance(multiplier) && !bankrupt_logged {
                    warn!(
                        "NAV exhausted ({}) on {}; risky weight held at zero",
                        state.portfolio_value, date
                    );
                    bankrupt_logged = true;
                }
            }

            if floor_policy == FloorPolicy::Dynamic
                && state.fully_invested()
                && state.ratchet_floor(floor)
            {
                result.ratchet_count += 1;
                debug!("Floor ratcheted to {:.6} on {}", state.floor_level, date);
            }

            let floor_level = state.floor_level;
            state.apply_returns(risky_return, safe_return);

            result.push(SimulationRow {
                date,
                portfolio_value: state.portfolio_value,
                risky_weight: state.risky_weight,
                floor_level,
                rebalanced,
            });
        }

        debug!(
            "{} CPPI (floor={}, m={}): {} steps, {} rebalances, {} ratchets, final NAV {:.6}",
            floor_policy,
            floor,
            multiplier,
            result.len(),
            result.rebalance_count,
            result.ratchet_count,
            result.final_value()
        );

        result
    }
}

//! CPPI simulation with static and ratcheting floors

mod state;
mod engine;
mod result;
pub mod benchmark;
pub mod diagnostics;

pub use state::SimulationState;
pub use engine::{CppiEngine, CppiConfig, FloorPolicy};
pub use result::{SimulationResult, SimulationRow};
pub use benchmark::buy_and_hold;
pub use diagnostics::{freeze_report, is_frozen, FreezeReport};

use crate::error::Result;
use crate::returns::{DualReturnSeries, ValueSeries};
use crate::schedule::RebalanceSchedule;

// ============================================================================
// Defaults
// ============================================================================
// NAV is unit-normalized, so the floor fraction and the initial floor level
// coincide.

/// Starting portfolio value
pub const INITIAL_PORTFOLIO_VALUE: f64 = 1.0;

/// Zero-weight share at or above which a run counts as frozen
pub const DEFAULT_FREEZE_THRESHOLD: f64 = 0.5;

/// Run one policy end to end: parse the frequency, build the schedule, simulate
pub fn simulate(
    returns: &DualReturnSeries,
    config: CppiConfig,
    rebalance_frequency: &str,
) -> Result<SimulationResult> {
    let engine = CppiEngine::new(config)?;
    let schedule = crate::schedule::rebalance_dates(returns.dates(), rebalance_frequency)?;
    Ok(engine.run(returns, &schedule))
}

/// Static-floor CPPI, returning `(value_series, weight_sequence)`
pub fn simulate_cppi(
    returns: &DualReturnSeries,
    floor: f64,
    multiplier: f64,
    rebalance_frequency: &str,
) -> Result<(ValueSeries, Vec<f64>)> {
    let config = CppiConfig { floor, multiplier, floor_policy: FloorPolicy::Static };
    Ok(simulate(returns, config, rebalance_frequency)?.into_parts())
}

/// Dynamic-floor CPPI, returning `(value_series, weight_sequence)`
pub fn simulate_cppi_dynamic_floor(
    returns: &DualReturnSeries,
    floor: f64,
    multiplier: f64,
    rebalance_frequency: &str,
) -> Result<(ValueSeries, Vec<f64>)> {
    let config = CppiConfig { floor, multiplier, floor_policy: FloorPolicy::Dynamic };
    Ok(simulate(returns, config, rebalance_frequency)?.into_parts())
}

/// Run with a prebuilt schedule, for callers reusing one schedule across runs
pub fn simulate_with_schedule(
    returns: &DualReturnSeries,
    config: CppiConfig,
    schedule: &RebalanceSchedule,
) -> Result<SimulationResult> {
    Ok(CppiEngine::new(config)?.run(returns, schedule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CppiError;
    use chrono::NaiveDate;

    fn flat_series(n: usize) -> DualReturnSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        DualReturnSeries::from_rows((0..n).map(|i| (start + chrono::Days::new(i as u64), 0.0, 0.0)))
            .unwrap()
    }

    #[test]
    fn test_flat_returns_flat_value() {
        let returns = flat_series(10);
        let (values, weights) = simulate_cppi(&returns, 0.8, 3.0, "D").unwrap();

        assert_eq!(values.len(), 10);
        assert_eq!(weights.len(), 10);
        assert!(values.values.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_spy_shy_scenario_both_policies() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let returns = DualReturnSeries::from_rows(vec![(d, 0.05, 0.0)]).unwrap();

        let (values, weights) = simulate_cppi(&returns, 0.8, 3.0, "daily").unwrap();
        assert!((weights[0] - 0.6).abs() < 1e-12);
        assert!((values.values[0] - 1.03).abs() < 1e-12);

        let (values, _) = simulate_cppi_dynamic_floor(&returns, 0.8, 3.0, "daily").unwrap();
        assert!((values.values[0] - 1.03).abs() < 1e-12);
    }

    #[test]
    fn test_errors_surface_at_call() {
        let returns = flat_series(3);
        assert!(matches!(
            simulate_cppi(&returns, 0.8, 3.0, "hourly"),
            Err(CppiError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            simulate_cppi_dynamic_floor(&returns, 0.8, -1.0, "D"),
            Err(CppiError::InvalidConfiguration(_))
        ));
        assert!(simulate_cppi(&returns, 0.0, 3.0, "D").is_err());
    }

    #[test]
    fn test_empty_series() {
        let returns = DualReturnSeries::from_rows(Vec::new()).unwrap();
        let (values, weights) = simulate_cppi(&returns, 0.8, 3.0, "ME").unwrap();
        assert!(values.is_empty());
        assert!(weights.is_empty());
    }
}

//! Buy-and-hold reference paths for comparison against CPPI

use super::result::{SimulationResult, SimulationRow};
use super::state::SimulationState;
use super::{FloorPolicy, INITIAL_PORTFOLIO_VALUE};
use crate::error::{CppiError, Result};
use crate::returns::DualReturnSeries;

/// Hold a fixed risky weight on every step
///
/// A weight of 1.0 is buy-and-hold of the risky asset, 0.0 of the safe one.
/// The floor column is reported as zero; there is no insurance.
pub fn buy_and_hold(returns: &DualReturnSeries, risky_weight: f64) -> Result<SimulationResult> {
    if !(0.0..=1.0).contains(&risky_weight) {
        return Err(CppiError::InvalidConfiguration(format!(
            "buy-and-hold weight must be in [0, 1], got {}",
            risky_weight
        )));
    }

    let mut state = SimulationState::new(INITIAL_PORTFOLIO_VALUE, 0.0);
    state.risky_weight = risky_weight;

    let mut result = SimulationResult::with_capacity(FloorPolicy::Static, returns.len());
    for (date, risky_return, safe_return) in returns.rows() {
        state.apply_returns(risky_return, safe_return);
        result.push(SimulationRow {
            date,
            portfolio_value: state.portfolio_value,
            risky_weight,
            floor_level: 0.0,
            rebalanced: false,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn returns() -> DualReturnSeries {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        DualReturnSeries::from_rows(vec![
            (d(1), 0.10, 0.01),
            (d(4), -0.20, 0.01),
            (d(5), 0.05, 0.01),
        ])
        .unwrap()
    }

    #[test]
    fn test_buy_and_hold_tracks_risky_asset() {
        let result = buy_and_hold(&returns(), 1.0).unwrap();
        let expected = 1.10 * 0.80 * 1.05;
        assert!((result.final_value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_half_mix() {
        let result = buy_and_hold(&returns(), 0.5).unwrap();
        let expected = (1.0 + 0.055) * (1.0 - 0.095) * (1.0 + 0.03);
        assert!((result.final_value() - expected).abs() < 1e-12);
        assert!(result.weights.iter().all(|&w| w == 0.5));
    }

    #[test]
    fn test_weight_out_of_range() {
        assert!(buy_and_hold(&returns(), 1.5).is_err());
    }
}

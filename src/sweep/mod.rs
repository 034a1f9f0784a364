//! Parallel floor x multiplier parameter sweeps
//!
//! Each grid point is an independent simulation with its own state, so the
//! grid is evaluated with rayon. The schedule is built once and shared
//! read-only.

use crate::config::SweepParams;
use crate::error::Result;
use crate::metrics::performance_metrics;
use crate::returns::DualReturnSeries;
use crate::schedule::RebalanceSchedule;
use crate::simulation::{freeze_report, CppiConfig, CppiEngine, FloorPolicy};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Summary of one grid point
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub policy: FloorPolicy,
    pub floor: f64,
    pub multiplier: f64,
    pub final_value: f64,
    pub rebalances: usize,
    pub ratchets: usize,
    pub zero_weight_fraction: f64,
    pub frozen: bool,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub kurtosis: Option<f64>,
    pub skewness: Option<f64>,
    pub annualized_volatility: f64,
    pub var: f64,
    pub cvar: f64,
}

/// Grid points in reporting order: policy, then floor, then multiplier
fn grid(params: &SweepParams) -> Vec<CppiConfig> {
    let mut points = Vec::with_capacity(params.grid_size());
    for &floor_policy in &params.policies {
        for &floor in &params.floors {
            for &multiplier in &params.multipliers {
                points.push(CppiConfig { floor, multiplier, floor_policy });
            }
        }
    }
    points
}

/// Simulate and score every grid point
///
/// Rows come back in grid order regardless of scheduling.
pub fn run_sweep(returns: &DualReturnSeries, params: &SweepParams) -> Result<Vec<SweepRow>> {
    params.validate()?;

    let start = Instant::now();
    let schedule = RebalanceSchedule::build(returns.dates(), params.rebalance_frequency);
    let points = grid(params);

    let rows = points
        .par_iter()
        .map(|config| run_point(returns, &schedule, *config, params))
        .collect::<Result<Vec<SweepRow>>>()?;

    info!(
        "Sweep of {} runs over {} dates complete in {:?}",
        rows.len(),
        returns.len(),
        start.elapsed()
    );
    Ok(rows)
}

fn run_point(
    returns: &DualReturnSeries,
    schedule: &RebalanceSchedule,
    config: CppiConfig,
    params: &SweepParams,
) -> Result<SweepRow> {
    let result = CppiEngine::new(config)?.run(returns, schedule);
    let freeze = freeze_report(&result.weights, params.freeze_threshold);
    let metrics = performance_metrics(&result.returns().values, params.var_confidence)?;

    Ok(SweepRow {
        policy: config.floor_policy,
        floor: config.floor,
        multiplier: config.multiplier,
        final_value: result.final_value(),
        rebalances: result.rebalance_count,
        ratchets: result.ratchet_count,
        zero_weight_fraction: freeze.zero_weight_fraction,
        frozen: freeze.frozen,
        sharpe_ratio: metrics.sharpe_ratio,
        max_drawdown: metrics.max_drawdown,
        kurtosis: metrics.kurtosis,
        skewness: metrics.skewness,
        annualized_volatility: metrics.annualized_volatility,
        var: metrics.var,
        cvar: metrics.cvar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RebalanceFrequency;
    use crate::simulation::simulate_with_schedule;
    use chrono::NaiveDate;

    fn returns(n: usize) -> DualReturnSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        DualReturnSeries::from_rows((0..n).map(|i| {
            let risky = 0.012 * ((i as f64) * 0.7).sin() - if i % 17 == 0 { 0.03 } else { 0.0 };
            (start + chrono::Days::new(i as u64), risky, 0.0001)
        }))
        .unwrap()
    }

    #[test]
    fn test_grid_order_and_size() {
        let params = SweepParams {
            floors: vec![0.7, 0.9],
            multipliers: vec![2.0, 4.0, 6.0],
            policies: vec![FloorPolicy::Static, FloorPolicy::Dynamic],
            rebalance_frequency: RebalanceFrequency::Weekly,
            ..Default::default()
        };
        let rows = run_sweep(&returns(250), &params).unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].policy, FloorPolicy::Static);
        assert_eq!((rows[0].floor, rows[0].multiplier), (0.7, 2.0));
        assert_eq!((rows[5].floor, rows[5].multiplier), (0.9, 6.0));
        assert_eq!(rows[6].policy, FloorPolicy::Dynamic);
        assert!(rows.iter().all(|r| r.cvar <= r.var && r.max_drawdown <= 0.0));
    }

    #[test]
    fn test_rows_match_individual_runs() {
        let data = returns(300);
        let params = SweepParams {
            floors: vec![0.8],
            multipliers: vec![3.0],
            policies: vec![FloorPolicy::Dynamic],
            rebalance_frequency: RebalanceFrequency::Daily,
            ..Default::default()
        };
        let rows = run_sweep(&data, &params).unwrap();

        let schedule = RebalanceSchedule::build(data.dates(), RebalanceFrequency::Daily);
        let config = CppiConfig { floor: 0.8, multiplier: 3.0, floor_policy: FloorPolicy::Dynamic };
        let single = simulate_with_schedule(&data, config, &schedule).unwrap();

        assert_eq!(rows[0].final_value, single.final_value());
        assert_eq!(rows[0].ratchets, single.ratchet_count);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let params = SweepParams { floors: vec![0.8, 1.5], ..Default::default() };
        assert!(run_sweep(&returns(50), &params).is_err());
    }
}

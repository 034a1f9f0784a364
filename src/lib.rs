//! Constant Proportion Portfolio Insurance (CPPI) simulation and performance metrics
//!
//! - [`schedule`]: which dates may rebalance (daily, weekly, month-end)
//! - [`simulation`]: the CPPI state machine with static or ratcheting floor
//! - [`metrics`]: Sharpe, volatility, drawdown, moments, historical VaR/CVaR
//! - [`sweep`]: parallel floor x multiplier grids
//! - [`returns`]: series types and loading of cached price files

pub mod config;
pub mod error;
pub mod metrics;
pub mod returns;
pub mod schedule;
pub mod simulation;
pub mod sweep;

pub use config::{CppiParams, SweepParams};
pub use error::{CppiError, Result};
pub use metrics::{performance_metrics, performance_metrics_from_values, PerformanceMetrics};
pub use returns::{DualReturnSeries, ReturnSeries, TimeSeries, ValueSeries};
pub use schedule::{rebalance_dates, RebalanceFrequency, RebalanceSchedule};
pub use simulation::{
    is_frozen, simulate_cppi, simulate_cppi_dynamic_floor, CppiConfig, CppiEngine, FloorPolicy,
    SimulationResult,
};
pub use sweep::{run_sweep, SweepRow};

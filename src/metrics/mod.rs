//! Performance metrics for a return path
//!
//! Computes the fixed set of risk/return statistics used to compare CPPI
//! runs: Sharpe ratio, max drawdown, excess kurtosis, skewness, annualized
//! volatility, historical VaR and CVaR. All annualization assumes daily data.

pub mod drawdown;
pub mod moments;
pub mod tail;

use crate::config::validate_confidence;
use crate::error::{CppiError, Result};
use log::debug;
use serde::Serialize;

// ============================================================================
// Conventions
// ============================================================================

/// Trading periods per year used for annualization
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default VaR/CVaR confidence level
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// Statistics for one return series
///
/// `None` marks a statistic that is undefined for the input: the Sharpe
/// ratio of a zero-variance series, or skew/kurtosis of a sample too short
/// to estimate them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub kurtosis: Option<f64>,
    pub skewness: Option<f64>,
    pub annualized_volatility: f64,
    pub var: f64,
    pub cvar: f64,
    /// Confidence level VaR and CVaR were computed at
    pub var_confidence: f64,
    /// Number of returns the statistics were computed from
    pub observations: usize,
}

impl PerformanceMetrics {
    /// Sharpe ratio, or `DegenerateInput` if the returns have zero variance
    pub fn sharpe(&self) -> Result<f64> {
        self.sharpe_ratio.ok_or_else(|| {
            CppiError::DegenerateInput(
                "Sharpe ratio undefined: returns have zero standard deviation".into(),
            )
        })
    }

    /// Confidence level in whole percent, as used in the VaR/CVaR labels
    pub fn confidence_pct(&self) -> u32 {
        (self.var_confidence * 100.0).round() as u32
    }

    /// Named statistics in reporting order
    pub fn entries(&self) -> Vec<(String, Option<f64>)> {
        let pct = self.confidence_pct();
        vec![
            ("Sharpe Ratio".to_string(), self.sharpe_ratio),
            ("Max Drawdown".to_string(), Some(self.max_drawdown)),
            ("Kurtosis".to_string(), self.kurtosis),
            ("Skewness".to_string(), self.skewness),
            ("Annualized Volatility".to_string(), Some(self.annualized_volatility)),
            (format!("VaR {}%", pct), Some(self.var)),
            (format!("CVaR {}%", pct), Some(self.cvar)),
        ]
    }

    /// Look up a statistic by its reporting label
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(label, _)| label == name)
            .and_then(|(_, value)| value)
    }
}

/// Compute all statistics from a series of fractional period returns
///
/// Non-finite returns are ignored. At least two finite returns are needed.
pub fn performance_metrics(returns: &[f64], var_confidence: f64) -> Result<PerformanceMetrics> {
    validate_confidence(var_confidence)?;

    let clean: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    if clean.len() < returns.len() {
        debug!("Ignoring {} non-finite returns", returns.len() - clean.len());
    }
    let max_drawdown = drawdown::max_drawdown_from_returns(&clean);
    compute(&clean, max_drawdown, var_confidence)
}

/// Compute all statistics from a cumulative value (NAV) series
///
/// Returns are the period-over-period percentage change with the undefined
/// first value dropped; drawdown is measured on the values themselves.
pub fn performance_metrics_from_values(values: &[f64], var_confidence: f64) -> Result<PerformanceMetrics> {
    validate_confidence(var_confidence)?;

    let returns: Vec<f64> = values
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect();
    let max_drawdown = drawdown::max_drawdown(values);
    compute(&returns, max_drawdown, var_confidence)
}

fn compute(returns: &[f64], max_drawdown: f64, var_confidence: f64) -> Result<PerformanceMetrics> {
    if returns.len() < 2 {
        return Err(CppiError::DegenerateInput(format!(
            "need at least 2 returns for performance metrics, got {}",
            returns.len()
        )));
    }

    let ann_factor = TRADING_DAYS_PER_YEAR.sqrt();
    let mean = moments::mean(returns);
    // Constant returns carry no risk: volatility is zero and Sharpe undefined
    let std = if moments::is_constant(returns) {
        0.0
    } else {
        moments::sample_std(returns).unwrap_or(0.0)
    };

    let sharpe_ratio = if std > 0.0 {
        Some(mean / std * ann_factor)
    } else {
        None
    };

    // Non-empty input always yields a quantile, and the sample minimum
    // always lies in the tail
    let var = tail::historical_var(returns, var_confidence).unwrap_or(0.0);
    let cvar = tail::conditional_var(returns, var).unwrap_or(var);

    Ok(PerformanceMetrics {
        sharpe_ratio,
        max_drawdown,
        kurtosis: moments::excess_kurtosis(returns),
        skewness: moments::skewness(returns),
        annualized_volatility: std * ann_factor,
        var,
        cvar,
        var_confidence,
        observations: returns.len(),
    })
}

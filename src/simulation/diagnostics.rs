//! Post-run diagnostics on weight paths

use serde::Serialize;

/// Outcome of the frozen-strategy check
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FreezeReport {
    pub frozen: bool,
    /// Share of steps with a risky weight of exactly zero
    pub zero_weight_fraction: f64,
}

/// Check whether a run spent at least `threshold` of its steps fully out of the risky asset
///
/// An empty weight path is reported as not frozen with a zero fraction.
pub fn freeze_report(weights: &[f64], threshold: f64) -> FreezeReport {
    if weights.is_empty() {
        return FreezeReport { frozen: false, zero_weight_fraction: 0.0 };
    }
    let zeros = weights.iter().filter(|&&w| w == 0.0).count();
    let zero_weight_fraction = zeros as f64 / weights.len() as f64;
    FreezeReport {
        frozen: zero_weight_fraction >= threshold,
        zero_weight_fraction,
    }
}

/// `(frozen, fraction)` form of [`freeze_report`]
pub fn is_frozen(weights: &[f64], threshold: f64) -> (bool, f64) {
    let report = freeze_report(weights, threshold);
    (report.frozen, report.zero_weight_fraction)
}

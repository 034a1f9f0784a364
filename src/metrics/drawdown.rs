//! Drawdown of a wealth path

/// Running drawdown `(value - peak) / peak` at each point of a value path
///
/// Points before the path first turns positive have no meaningful peak and
/// report zero.
pub fn drawdown_curve(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            if peak > 0.0 {
                (v - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

/// Most negative drawdown of a value path (0 if it never fell below a prior peak)
pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdown_curve(values)
        .into_iter()
        .fold(0.0, f64::min)
}

/// Wealth path `cumprod(1 + r)` from a return series
pub fn wealth_from_returns(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth
        })
        .collect()
}

/// Max drawdown of the wealth reconstructed from returns
pub fn max_drawdown_from_returns(returns: &[f64]) -> f64 {
    max_drawdown(&wealth_from_returns(returns))
}

//! Historical tail-risk measures

use super::moments::mean;

/// Sort a copy ascending; NaNs must already be filtered out
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Empirical quantile with linear interpolation between order statistics
///
/// Position `q * (n - 1)` in the sorted sample; `None` for an empty sample.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let pos = q.clamp(0.0, 1.0) * (v.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(v[lo] + (v[hi] - v[lo]) * frac)
}

/// Historical VaR: the `(1 - confidence)` quantile of returns
///
/// Reported as a return (negative for a loss), not a positive loss amount.
pub fn historical_var(returns: &[f64], confidence: f64) -> Option<f64> {
    quantile(returns, 1.0 - confidence)
}

/// Expected shortfall: mean of all returns at or below the VaR threshold
///
/// The sample minimum is always at or below the threshold, so the tail is
/// never empty for a non-empty sample.
pub fn conditional_var(returns: &[f64], var: f64) -> Option<f64> {
    let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= var).collect();
    if tail.is_empty() {
        None
    } else {
        Some(mean(&tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(5.0));
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        // pos = 0.1 * 4 = 0.4 -> 1.0 + 0.4 * (2.0 - 1.0)
        assert!((quantile(&values, 0.1).unwrap() - 1.4).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_var_and_cvar() {
        // 20 returns: -0.10, -0.09, ..., 0.09
        let returns: Vec<f64> = (0..20).map(|i| (i as f64 - 10.0) / 100.0).collect();
        let var = historical_var(&returns, 0.95).unwrap();
        // pos = 0.05 * 19 = 0.95 -> -0.10 + 0.95 * 0.01
        assert!((var - (-0.0905)).abs() < 1e-12);

        let cvar = conditional_var(&returns, var).unwrap();
        assert!((cvar - (-0.10)).abs() < 1e-12);
        assert!(cvar <= var);
    }

    #[test]
    fn test_cvar_includes_ties_at_threshold() {
        let returns = [-0.05, -0.05, -0.05, 0.01, 0.02];
        let var = historical_var(&returns, 0.6).unwrap();
        assert_eq!(var, -0.05);
        let cvar = conditional_var(&returns, var).unwrap();
        assert!((cvar - (-0.05)).abs() < 1e-12);
    }
}

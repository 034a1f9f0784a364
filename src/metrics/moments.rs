//! Sample moments of a return distribution
//!
//! Mean and standard deviation come from `statrs`. Skewness and kurtosis use
//! the bias-corrected estimators pandas reports, which `statrs` does not offer.

use statrs::statistics::Statistics;

/// Arithmetic mean (0 for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().mean()
    }
}

/// Sample standard deviation with `n - 1` in the denominator
///
/// Returns `None` for fewer than two observations.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// Whether a sample has no dispersion
///
/// True when every value equals the first, or when the standard deviation is
/// within rounding noise of the mean.
pub fn is_constant(values: &[f64]) -> bool {
    let Some((first, rest)) = values.split_first() else {
        return true;
    };
    if rest.iter().all(|x| x == first) {
        return true;
    }
    match sample_std(values) {
        Some(std) => std <= f64::EPSILON * mean(values).abs(),
        None => true,
    }
}

/// Sums of squared, cubed and fourth-power deviations from the mean
fn central_sums(values: &[f64]) -> (f64, f64, f64) {
    let m = mean(values);
    let mut s2 = 0.0;
    let mut s3 = 0.0;
    let mut s4 = 0.0;
    for x in values {
        let d = x - m;
        let d2 = d * d;
        s2 += d2;
        s3 += d2 * d;
        s4 += d2 * d2;
    }
    (s2, s3, s4)
}

/// Adjusted Fisher-Pearson sample skewness
///
/// `G1 = sqrt(n(n-1)) / (n-2) * m3 / m2^1.5` with biased moments `m2`, `m3`.
/// Needs at least three observations; a constant sample has zero skew.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let nf = n as f64;
    let (s2, s3, _) = central_sums(values);
    let m2 = s2 / nf;
    let m3 = s3 / nf;
    Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * m3 / m2.powf(1.5))
}

/// Bias-corrected sample excess kurtosis
///
/// `n(n+1)(n-1) S4 / ((n-2)(n-3) S2^2) - 3(n-1)^2 / ((n-2)(n-3))` where
/// `S2`, `S4` are sums of squared and fourth-power deviations. Needs at least
/// four observations; a constant sample has zero excess kurtosis.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let nf = n as f64;
    let (s2, _, s4) = central_sums(values);
    let denom = (nf - 2.0) * (nf - 3.0);
    let adj = 3.0 * (nf - 1.0).powi(2) / denom;
    Some(nf * (nf + 1.0) * (nf - 1.0) * s4 / (denom * s2 * s2) - adj)
}

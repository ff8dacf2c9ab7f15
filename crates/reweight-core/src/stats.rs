//! Stateless numeric helpers shared by the histogram and reweighting code
//!
//! Plain means and variances come from `statrs`; the weighted mean and the
//! trapezoidal integral are small enough to live here.

use crate::{Error, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    data.iter().mean()
}

/// Weighted arithmetic mean `sum(a_i * w_i) / sum(w_i)`
///
/// Returns NaN when the weights sum to zero, the same way an empty mean does.
pub fn weighted_mean(data: &[f64], weights: &[f64]) -> Result<f64> {
    if data.len() != weights.len() {
        return Err(Error::size_mismatch(data.len(), weights.len(), "weighted mean"));
    }

    let (total, total_weight) = data
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(t, tw), (&a, &w)| (t + a * w, tw + w));

    Ok(total / total_weight)
}

/// Population variance (divides by `n`)
pub fn variance(data: &[f64]) -> f64 {
    data.iter().population_variance()
}

/// Population standard deviation
pub fn sdev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Trapezoidal integral of `y` over the abscissae `x`
///
/// `x` need not be equally spaced. Fewer than two points integrate to zero.
pub fn trapz(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "trapezoidal integration"));
    }

    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-12);
        assert_relative_eq!(variance(&data), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sdev(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mean_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(sdev(&[]).is_nan());
    }

    #[test]
    fn test_weighted_mean() {
        let m = weighted_mean(&[1.0, 3.0], &[3.0, 1.0]).unwrap();
        assert_relative_eq!(m, 1.5);

        // uniform weights reduce to the plain mean
        let data = [1.0, 2.0, 6.0];
        assert_relative_eq!(weighted_mean(&data, &[1.0; 3]).unwrap(), mean(&data), epsilon = 1e-12);

        assert!(weighted_mean(&[1.0], &[0.0]).unwrap().is_nan());
        assert!(weighted_mean(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_trapz() {
        // integral of x over [0, 2]
        let x = [0.0, 0.5, 1.0, 2.0];
        let y = x;
        assert_relative_eq!(trapz(&x, &y).unwrap(), 2.0, epsilon = 1e-12);

        assert_eq!(trapz(&[1.0], &[5.0]).unwrap(), 0.0);
        assert_eq!(trapz(&[], &[]).unwrap(), 0.0);
        assert!(trapz(&[0.0, 1.0], &[1.0]).is_err());
    }
}

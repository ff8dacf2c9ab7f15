//! # Integrated Autocorrelation Time
//!
//! FFT based estimate of the integrated autocorrelation time τ of a scalar
//! time series, used to choose how many consecutive Monte-Carlo samples to
//! skip between effectively independent draws.
//!
//! ## Method
//!
//! 1. Subtract the mean.
//! 2. Zero-pad to `2N - 1` so the circular correlation equals the linear one.
//! 3. Forward FFT, replace every coefficient by its squared magnitude.
//! 4. Inverse FFT; the real parts of the first `N` entries are the
//!    autocovariance at lags `0..N`.
//! 5. Normalize by lag 0 and sum up to, but excluding, the first lag whose
//!    value is not positive.
//!
//! Stopping at the first non-positive lag gives an upper-bound estimate with
//! much less noise than summing the full tail.
//!
//! ## Basic Usage
//!
//! ```rust
//! use reweight_autocorr::{autocorrelation_time, AutocorrelationEstimator};
//!
//! let series: Vec<f64> = (0..512).map(|i| ((i * 7919) % 101) as f64).collect();
//! let tau = autocorrelation_time(&series).unwrap();
//! assert!(tau >= 1.0);
//!
//! // Reuse FFT plans across calls with growing windows
//! let mut estimator = AutocorrelationEstimator::new();
//! let short = estimator.estimate(&series[..128]).unwrap();
//! let long = estimator.estimate(&series).unwrap();
//! assert!(short.is_finite() && long.is_finite());
//! ```

use reweight_core::{Error, Result};
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

/// Autocorrelation time estimator with cached FFT plans
///
/// `rustfft`'s planner memoizes plans per length, and the estimator keeps
/// its work buffer between calls, so repeated estimates on a window that
/// keeps doubling only pay for planning each new length once.
pub struct AutocorrelationEstimator {
    planner: FftPlanner<f64>,
    buffer: Vec<Complex<f64>>,
}

impl Default for AutocorrelationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocorrelationEstimator {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            buffer: Vec::new(),
        }
    }

    /// Normalized autocorrelation function at lags `0..N`
    ///
    /// Lag 0 is 1 unless the series has zero variance, in which case every
    /// lag is NaN.
    pub fn autocorrelation(&mut self, series: &[f64]) -> Result<Vec<f64>> {
        let autocov = self.autocovariance(series)?;
        let r0 = autocov[0];
        Ok(autocov.iter().map(|&r| r / r0).collect())
    }

    /// Integrated autocorrelation time of `series`
    pub fn estimate(&mut self, series: &[f64]) -> Result<f64> {
        let autocov = self.autocovariance(series)?;
        let r0 = autocov[0];

        let mut tau = 0.0;
        for (lag, &r) in autocov.iter().enumerate() {
            // also stops at lag 0 for a constant series
            if !(r > 0.0) {
                trace!("autocorrelation non-positive at lag {lag}");
                break;
            }
            tau += r / r0;
        }
        Ok(tau)
    }

    /// Unnormalized autocovariance at lags `0..N`
    fn autocovariance(&mut self, series: &[f64]) -> Result<Vec<f64>> {
        let n = series.len();
        if n == 0 {
            return Err(Error::empty_input("autocorrelation"));
        }
        if series.iter().any(|x| !x.is_finite()) {
            return Err(Error::non_finite("time series"));
        }

        let padded = 2 * n - 1;
        let mean = reweight_core::stats::mean(series);

        self.buffer.clear();
        self.buffer
            .extend(series.iter().map(|&x| Complex::new(x - mean, 0.0)));
        self.buffer.resize(padded, Complex::new(0.0, 0.0));

        let fft = self.planner.plan_fft_forward(padded);
        fft.process(&mut self.buffer);

        for c in self.buffer.iter_mut() {
            *c = Complex::new(c.norm_sqr(), 0.0);
        }

        let ifft = self.planner.plan_fft_inverse(padded);
        ifft.process(&mut self.buffer);

        // rustfft does not normalize; the 1/padded factor cancels in every
        // ratio the callers take, but keep the values true covariances
        let scale = 1.0 / padded as f64;
        Ok(self.buffer[..n].iter().map(|c| c.re * scale).collect())
    }
}

/// One-shot convenience wrapper around [`AutocorrelationEstimator::estimate`]
pub fn autocorrelation_time(series: &[f64]) -> Result<f64> {
    AutocorrelationEstimator::new().estimate(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal};

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let noise = white_noise(n, seed);
        let mut x = 0.0;
        noise
            .iter()
            .map(|e| {
                x = phi * x + e;
                x
            })
            .collect()
    }

    /// O(N²) lag sum, the reference the FFT path must reproduce
    fn naive_autocovariance(series: &[f64]) -> Vec<f64> {
        let n = series.len();
        let m = series.iter().sum::<f64>() / n as f64;
        (0..n)
            .map(|lag| {
                (0..n - lag)
                    .map(|i| (series[i] - m) * (series[i + lag] - m))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_matches_naive_lag_sum() {
        let series = ar1(300, 0.7, 11);
        let naive = naive_autocovariance(&series);

        let mut estimator = AutocorrelationEstimator::new();
        let acf = estimator.autocorrelation(&series).unwrap();

        for (a, b) in acf.iter().zip(&naive) {
            assert_relative_eq!(*a, b / naive[0], epsilon = 1e-9);
        }
        assert_relative_eq!(acf[0], 1.0, epsilon = 1e-12);

        let expected: f64 = naive
            .iter()
            .take_while(|&&r| r > 0.0)
            .map(|r| r / naive[0])
            .sum();
        assert_relative_eq!(estimator.estimate(&series).unwrap(), expected, epsilon = 1e-8);
    }

    #[test]
    fn test_white_noise_is_short() {
        let tau = autocorrelation_time(&white_noise(4096, 3)).unwrap();
        assert!(tau >= 1.0, "lag 0 alone contributes 1, got {tau}");
        assert!(tau < 5.0, "white noise should decorrelate immediately, got {tau}");
    }

    #[test]
    fn test_correlated_series_is_long() {
        let tau_white = autocorrelation_time(&white_noise(20_000, 5)).unwrap();
        let tau_ar = autocorrelation_time(&ar1(20_000, 0.9, 5)).unwrap();
        assert!(tau_ar > 5.0, "AR(1) with phi=0.9 should be strongly correlated, got {tau_ar}");
        assert!(tau_ar > 2.0 * tau_white);
    }

    #[test]
    fn test_repeated_calls_with_growing_windows() {
        let series = ar1(4096, 0.5, 9);
        let mut estimator = AutocorrelationEstimator::new();

        let mut window = 256;
        while window <= series.len() {
            let reused = estimator.estimate(&series[..window]).unwrap();
            let fresh = autocorrelation_time(&series[..window]).unwrap();
            assert_relative_eq!(reused, fresh, epsilon = 1e-12);
            window *= 2;
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            autocorrelation_time(&[]),
            Err(Error::InsufficientData { .. })
        ));
        assert_eq!(autocorrelation_time(&[4.2]).unwrap(), 0.0);
        assert_eq!(autocorrelation_time(&[1.0; 64]).unwrap(), 0.0);
        assert!(autocorrelation_time(&[1.0, f64::NAN]).is_err());
    }
}

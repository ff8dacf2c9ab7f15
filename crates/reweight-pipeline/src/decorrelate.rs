//! Stride selection from the integrated autocorrelation time

use reweight_autocorr::AutocorrelationEstimator;
use reweight_core::Result;
use tracing::{debug, info};

/// Samples in the first estimation window
pub const INITIAL_WINDOW: usize = 1000;

/// A window is trusted once it is this many autocorrelation times long
pub const WINDOW_FACTOR: f64 = 50.0;

/// Autocorrelation time of `samples`, estimated on a leading window that
/// doubles until it spans [`WINDOW_FACTOR`] times the estimate or the
/// whole series
pub fn autocorrelation_time(samples: &[f64]) -> Result<f64> {
    let mut estimator = AutocorrelationEstimator::new();
    let mut window = INITIAL_WINDOW.min(samples.len());

    loop {
        let tau = estimator.estimate(&samples[..window])?;
        if window as f64 >= WINDOW_FACTOR * tau || window >= samples.len() {
            debug!(window, tau, "autocorrelation time");
            return Ok(tau);
        }
        debug!(window, tau, "window too short for the estimate, doubling");
        window = (window * 2).min(samples.len());
    }
}

/// `ceil(2 tau)`, at least 1
pub fn stride_for(tau: f64) -> usize {
    let stride = (2.0 * tau).ceil();
    if stride.is_finite() && stride >= 1.0 {
        stride as usize
    } else {
        1
    }
}

/// Stride that makes the kept samples effectively independent
pub fn determine_stride(samples: &[f64]) -> Result<usize> {
    let tau = autocorrelation_time(samples)?;
    let stride = stride_for(tau);
    info!("autocorrelation time {tau:.3}, using every {stride}. sample");
    Ok(stride)
}

/// Every `stride`-th sample, starting with the first
pub fn decorrelate(samples: &[f64], stride: usize) -> Vec<f64> {
    samples.iter().step_by(stride.max(1)).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                x = phi * x + rng.gen::<f64>() - 0.5;
                x
            })
            .collect()
    }

    #[test]
    fn test_stride_for() {
        assert_eq!(stride_for(0.0), 1);
        assert_eq!(stride_for(0.5), 1);
        assert_eq!(stride_for(0.6), 2);
        assert_eq!(stride_for(7.2), 15);
        assert_eq!(stride_for(f64::NAN), 1);
    }

    #[test]
    fn test_decorrelate() {
        let samples: Vec<f64> = (0..7).map(f64::from).collect();
        assert_eq!(decorrelate(&samples, 3), vec![0.0, 3.0, 6.0]);
        assert_eq!(decorrelate(&samples, 0), samples);
    }

    #[test]
    fn test_white_noise_needs_small_stride() {
        let samples = ar1(0.0, 5_000, 1);
        let stride = determine_stride(&samples).unwrap();
        assert!(stride <= 10, "stride {stride}");
    }

    #[test]
    fn test_correlated_series_grows_window() {
        // tau of an AR(1) process with phi = 0.98 is about 50, so the
        // initial window is too short
        let samples = ar1(0.98, 40_000, 2);
        let tau = autocorrelation_time(&samples).unwrap();
        assert!(tau > 10.0, "tau {tau}");
        assert!(determine_stride(&samples).unwrap() > 20);
    }

    #[test]
    fn test_short_series() {
        assert_eq!(determine_stride(&[1.0]).unwrap(), 1);
        assert!(determine_stride(&[]).is_err());
    }
}

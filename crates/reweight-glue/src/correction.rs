//! Bias models and per-bin bias correction

use reweight_core::{Error, Result};
use reweight_histogram::Histogram;

/// How the input histograms were biased
#[derive(Debug, Clone, PartialEq)]
pub enum BiasModel {
    /// Inputs are already unbiased estimates (e.g. Wang-Landau log densities
    /// of states) and are used as they are
    Unbiased,
    /// Boltzmann-type exponential tilting; `thetas[i]` is the temperature
    /// histogram `i` was sampled at
    Boltzmann(Vec<f64>),
}

impl BiasModel {
    /// An empty temperature list means no bias
    pub fn from_thetas(thetas: Vec<f64>) -> Self {
        if thetas.is_empty() {
            Self::Unbiased
        } else {
            Self::Boltzmann(thetas)
        }
    }

    pub fn is_biased(&self) -> bool {
        matches!(self, Self::Boltzmann(_))
    }

    /// Temperature of histogram `i`, if biased
    pub fn theta(&self, i: usize) -> Option<f64> {
        match self {
            Self::Unbiased => None,
            Self::Boltzmann(thetas) => thetas.get(i).copied(),
        }
    }

    /// Check the model against `n_histograms` inputs
    pub fn validate(&self, n_histograms: usize) -> Result<()> {
        let Self::Boltzmann(thetas) = self else {
            return Ok(());
        };
        if thetas.len() != n_histograms {
            return Err(Error::size_mismatch(n_histograms, thetas.len(), "bias parameters"));
        }
        if thetas.iter().any(|t| !t.is_finite()) {
            return Err(Error::non_finite("bias parameters"));
        }
        if thetas.iter().any(|&t| t == 0.0) {
            return Err(Error::InvalidParameter("bias parameter theta must be non-zero".into()));
        }
        Ok(())
    }

    /// Label for diagnostics, `T = <theta>` or the histogram index
    pub(crate) fn label(&self, i: usize) -> String {
        match self.theta(i) {
            Some(theta) => format!("T = {theta}"),
            None => format!("histogram {i}"),
        }
    }
}

/// Undo the Boltzmann bias of one bin in log space
///
/// `P(s) / Z = exp(s / theta) * P_theta(s)`, so the logarithm is
/// `s / theta + ln P_theta(s)` and never leaves a comfortable range.
pub fn correct_bias(s: f64, theta: f64, p_theta: f64) -> f64 {
    s / theta + p_theta.ln()
}

/// Bias-corrected series of one histogram
///
/// Bins whose content is not positive become NaN and drop out of every
/// later step.
pub fn corrected_series(hist: &Histogram, theta: Option<f64>) -> Vec<f64> {
    let centers = hist.centers();
    hist.data()
        .iter()
        .zip(&centers)
        .map(|(&count, &center)| {
            if !(count > 0.0) {
                return f64::NAN;
            }
            match theta {
                Some(theta) => correct_bias(center, theta, count),
                None => count,
            }
        })
        .collect()
}

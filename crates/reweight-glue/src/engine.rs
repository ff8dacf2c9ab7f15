//! Multi-histogram reweighting

use crate::correction::{corrected_series, BiasModel};
use crate::shift::cumulative_shifts;
use reweight_core::stats::{trapz, weighted_mean};
use reweight_core::{Error, Result};
use reweight_histogram::Histogram;
use tracing::{debug, instrument, warn};

/// Largest magnitude a merged value may have and still enter the integral
const EXTREME: f64 = 1e300;

/// Glues biased histograms into one normalized log-density
///
/// # Example
///
/// ```
/// use reweight_glue::Glue;
/// use reweight_histogram::Histogram;
///
/// let mut hist = Histogram::new(4, 0.0, 4.0);
/// for v in [0.5, 1.5, 1.5, 2.5, 2.5, 2.5, 3.5] {
///     hist.add(v);
/// }
///
/// let glue = Glue::new(0.0).with_thetas(vec![1.0]);
/// let result = glue.glue(&[hist]).unwrap();
/// assert_eq!(result.histogram.num_bins(), 4);
/// assert_eq!(result.shifts, vec![0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Glue {
    threshold: f64,
    bias: BiasModel,
}

/// Output of one glue run
#[derive(Debug, Clone)]
pub struct GlueResult {
    /// Normalized log-density on the shared borders
    pub histogram: Histogram,
    /// Cumulative shift constant per input, `shifts[0] == 0`
    pub shifts: Vec<f64>,
    /// Bias-corrected series per input with its shift applied
    pub corrected: Vec<Vec<f64>>,
    /// Logarithm of the area under the merged curve
    pub log_area: f64,
}

impl Glue {
    /// Unbiased glue with the given overlap threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            bias: BiasModel::Unbiased,
        }
    }

    /// Boltzmann bias with one temperature per input; empty means unbiased
    pub fn with_thetas(mut self, thetas: Vec<f64>) -> Self {
        self.bias = BiasModel::from_thetas(thetas);
        self
    }

    pub fn with_bias(mut self, bias: BiasModel) -> Self {
        self.bias = bias;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bias(&self) -> &BiasModel {
        &self.bias
    }

    /// Check the inputs against the preconditions of [`Glue::glue`]
    pub fn validate(&self, hists: &[Histogram]) -> Result<()> {
        if hists.is_empty() {
            return Err(Error::empty_input("glue"));
        }
        if self.threshold.is_nan() {
            return Err(Error::InvalidParameter("overlap threshold is NaN".into()));
        }
        self.bias.validate(hists.len())?;

        if let Some(index) = hists.iter().position(|h| !h.same_borders(&hists[0])) {
            return Err(Error::BorderMismatch { index });
        }
        Ok(())
    }

    /// Reweight and merge `hists`
    ///
    /// All inputs must share identical borders. Bins no input covers above
    /// the threshold come out as NaN.
    #[instrument(skip(self, hists), fields(n_hists = hists.len(), threshold = self.threshold))]
    pub fn glue(&self, hists: &[Histogram]) -> Result<GlueResult> {
        self.validate(hists)?;

        let mut corrected: Vec<Vec<f64>> = hists
            .iter()
            .enumerate()
            .map(|(i, h)| corrected_series(h, self.bias.theta(i)))
            .collect();

        let shifts = cumulative_shifts(hists, &corrected, &self.bias, self.threshold)?;
        for (series, &z) in corrected.iter_mut().zip(&shifts) {
            series
                .iter_mut()
                .filter(|v| v.is_finite())
                .for_each(|v| *v += z);
        }
        debug!(?shifts, "shift constants");

        let merged = if hists.len() == 1 {
            corrected[0].clone()
        } else {
            self.merge(hists, &corrected)?
        };

        let centers = hists[0].centers();
        let log_area = log_area(&centers, &merged)?;
        debug!(log_area, "area");

        let data = merged.iter().map(|v| v - log_area).collect();
        let histogram = Histogram::from_data(hists[0].borders().to_vec(), data)?;

        Ok(GlueResult {
            histogram,
            shifts,
            corrected,
            log_area,
        })
    }

    /// Weighted mean per bin over the inputs above threshold
    fn merge(&self, hists: &[Histogram], corrected: &[Vec<f64>]) -> Result<Vec<f64>> {
        let num_bins = hists[0].num_bins();
        let mut merged = Vec::with_capacity(num_bins);
        let mut values = Vec::with_capacity(hists.len());
        let mut weights = Vec::with_capacity(hists.len());

        for j in 0..num_bins {
            values.clear();
            weights.clear();
            for (hist, series) in hists.iter().zip(corrected) {
                let count = hist.at(j);
                if !(count > self.threshold) || !series[j].is_finite() {
                    continue;
                }
                values.push(series[j]);
                // counts of unrelated estimators are not comparable
                weights.push(if self.bias.is_biased() { count } else { 1.0 });
            }
            merged.push(if values.is_empty() {
                f64::NAN
            } else {
                weighted_mean(&values, &weights)?
            });
        }
        Ok(merged)
    }
}

/// `ln` of the trapezoidal area under `exp(merged)` over `centers`
///
/// Entries outside `(-1e300, 1e300)`, NaN included, are left out. The
/// maximum is factored out before exponentiating. Without any usable area
/// the result is NaN and a warning is logged.
pub fn log_area(centers: &[f64], merged: &[f64]) -> Result<f64> {
    let usable = |v: f64| v > -EXTREME && v < EXTREME;

    let shift = merged
        .iter()
        .copied()
        .filter(|&v| usable(v))
        .fold(f64::NEG_INFINITY, f64::max);

    let (x, y): (Vec<f64>, Vec<f64>) = centers
        .iter()
        .zip(merged)
        .filter(|(_, &v)| usable(v))
        .map(|(&c, &v)| (c, (v - shift).exp()))
        .unzip();

    let area = trapz(&x, &y)?;
    if !(area > 0.0 && area.is_finite()) {
        warn!(
            usable_bins = x.len(),
            "Can not normalize the glued histogram, it has no usable area"
        );
        return Ok(f64::NAN);
    }
    Ok(shift + area.ln())
}

impl GlueResult {
    /// Per-input corrected series as `center value` lines, inputs separated
    /// by a blank line
    pub fn corrected_table(&self) -> String {
        let centers = self.histogram.centers();
        self.corrected
            .iter()
            .map(|series| {
                centers
                    .iter()
                    .zip(series)
                    .map(|(c, v)| format!("{c} {v}\n"))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Glue `hists` biased with `thetas` (empty for unbiased inputs)
pub fn glue_histograms(hists: &[Histogram], thetas: &[f64], threshold: f64) -> Result<Histogram> {
    Glue::new(threshold)
        .with_thetas(thetas.to_vec())
        .glue(hists)
        .map(|result| result.histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counts(data: &[f64]) -> Histogram {
        let borders = (0..=data.len()).map(|b| b as f64).collect();
        Histogram::from_data(borders, data.to_vec()).unwrap()
    }

    #[test]
    fn test_single_histogram_is_only_normalized() {
        let hist = counts(&[1.0, 4.0, 2.0]);
        let result = Glue::new(0.0).with_thetas(vec![2.0]).glue(&[hist.clone()]).unwrap();

        let centers = hist.centers();
        for j in 0..3 {
            let expected = centers[j] / 2.0 + hist.at(j).ln() - result.log_area;
            assert_relative_eq!(result.histogram.at(j), expected, epsilon = 1e-12);
        }
        assert_eq!(result.shifts, vec![0.0]);
    }

    #[test]
    fn test_preconditions() {
        let glue = Glue::new(1.0);
        assert!(matches!(glue.glue(&[]), Err(Error::InsufficientData { .. })));

        let a = counts(&[1.0, 2.0]);
        let b = Histogram::from_data(vec![0.0, 1.0, 2.5], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            glue.glue(&[a.clone(), a.clone(), b]),
            Err(Error::BorderMismatch { index: 2 })
        ));

        let biased = Glue::new(1.0).with_thetas(vec![1.0, 2.0]);
        assert!(matches!(biased.glue(&[a]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_log_area_excludes_extremes() {
        let centers = [0.0, 1.0, 2.0, 3.0];
        let merged = [0.0, 0.0, f64::NAN, -1e301];
        // only the first two points contribute
        assert_relative_eq!(log_area(&centers, &merged).unwrap(), 0.0, epsilon = 1e-12);

        assert!(log_area(&centers, &[f64::NAN; 4]).unwrap().is_nan());
        assert!(log_area(&centers[..1], &[3.0]).unwrap().is_nan());
    }

    #[test]
    fn test_log_area_large_values_do_not_overflow() {
        let centers = [0.0, 1.0];
        let area = log_area(&centers, &[1000.0, 1000.0]).unwrap();
        assert_relative_eq!(area, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unbiased_merge_is_uniform() {
        // log-densities from two unrelated estimators over the same bins
        let a = counts(&[3.0, 3.0, 3.0]);
        let b = counts(&[2.0, 2.0, 2.0]);
        let result = Glue::new(0.5).glue(&[a, b]).unwrap();

        assert_relative_eq!(result.shifts[1], 1.0);
        // after the shift both agree, so the merge is flat
        let h = &result.histogram;
        assert_relative_eq!(h.at(0), h.at(1), epsilon = 1e-12);
        assert_relative_eq!(h.at(0), -(2f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_corrected_table_layout() {
        let result = Glue::new(0.0).glue(&[counts(&[1.0]), counts(&[2.0])]).unwrap();
        assert_eq!(result.corrected_table(), "0.5 1\n\n0.5 1\n");
    }
}

//! Shift constants between adjacent histograms

use crate::correction::BiasModel;
use reweight_core::stats::weighted_mean;
use reweight_core::Result;
use reweight_histogram::Histogram;
use tracing::{debug, warn};

/// Log-domain offset aligning `next` onto `prev`
///
/// Averages `prev_series[j] - next_series[j]` over the bins where both raw
/// counts exceed `threshold` and the difference is finite. With
/// `weighted` set each bin counts with the content of `next`; otherwise all
/// overlap bins count equally. Returns `None` when there is no overlap.
pub fn pairwise_shift(
    prev: &Histogram,
    prev_series: &[f64],
    next: &Histogram,
    next_series: &[f64],
    threshold: f64,
    weighted: bool,
) -> Result<Option<f64>> {
    let mut diffs = Vec::new();
    let mut weights = Vec::new();

    for (j, (&a, &b)) in prev.data().iter().zip(next.data()).enumerate() {
        if !(a > threshold && b > threshold) {
            continue;
        }
        let diff = prev_series[j] - next_series[j];
        if !diff.is_finite() {
            continue;
        }
        diffs.push(diff);
        weights.push(if weighted { b } else { 1.0 });
    }

    if diffs.is_empty() {
        return Ok(None);
    }
    weighted_mean(&diffs, &weights).map(Some)
}

/// Cumulative shifts `Z`, with `Z[0] = 0`
///
/// Only neighbours in input order are compared. A pair without overlap
/// contributes a zero step and a warning.
pub fn cumulative_shifts(
    hists: &[Histogram],
    series: &[Vec<f64>],
    bias: &BiasModel,
    threshold: f64,
) -> Result<Vec<f64>> {
    let mut shifts = Vec::with_capacity(hists.len());
    if hists.is_empty() {
        return Ok(shifts);
    }
    shifts.push(0.0);

    for i in 1..hists.len() {
        let step = pairwise_shift(
            &hists[i - 1],
            &series[i - 1],
            &hists[i],
            &series[i],
            threshold,
            bias.is_biased(),
        )?;
        let step = match step {
            Some(step) => step,
            None => {
                warn!(
                    "No overlap between {} and {}; using a shift of 0",
                    bias.label(i - 1),
                    bias.label(i)
                );
                0.0
            }
        };
        debug!(index = i, step, "pairwise shift");
        shifts.push(shifts[i - 1] + step);
    }

    Ok(shifts)
}

//! Core traits for histogram building

use crate::types::Histogram;
use reweight_core::Result;

/// Trait for building histograms from sample data
pub trait HistogramBuilder {
    /// Build a histogram from the given sample
    fn build(&self, sample: &[f64]) -> Result<Histogram>;

    /// Build from an iterator of samples without collecting them first
    ///
    /// The default collects and calls [`HistogramBuilder::build`]; builders
    /// whose binning is known up front override it to stream.
    fn build_from_iter<I>(&self, samples: I) -> Result<Histogram>
    where
        I: IntoIterator<Item = f64>,
        Self: Sized,
    {
        let sample: Vec<f64> = samples.into_iter().collect();
        self.build(&sample)
    }

    /// Get the target number of bins (if known)
    fn target_bins(&self) -> Option<usize> {
        None
    }
}

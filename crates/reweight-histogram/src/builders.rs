//! Various histogram building strategies

use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use reweight_core::{Error, Result};

/// Fraction of the data span added on each side by [`AutoRangeBuilder`]
pub const RANGE_PADDING: f64 = 0.05;

/// Fixed-width histogram builder
///
/// Creates a histogram with a specified number of equal-width bins over
/// explicit bounds. Samples outside the bounds land in the overflow
/// accumulators.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthBuilder {
    num_bins: usize,
    lower: f64,
    upper: f64,
}

impl FixedWidthBuilder {
    /// Create a new fixed-width histogram builder
    pub fn new(num_bins: usize, lower: f64, upper: f64) -> Result<Self> {
        if num_bins == 0 {
            return Err(Error::InvalidParameter("number of bins must be positive".into()));
        }
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(Error::InvalidParameter(format!(
                "invalid histogram range [{lower}, {upper})"
            )));
        }
        Ok(Self {
            num_bins,
            lower,
            upper,
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// An empty histogram with this binning
    pub fn empty(&self) -> Histogram {
        Histogram::new(self.num_bins, self.lower, self.upper)
    }
}

impl HistogramBuilder for FixedWidthBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        self.build_from_iter(sample.iter().copied())
    }

    fn build_from_iter<I>(&self, samples: I) -> Result<Histogram>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut hist = self.empty();
        samples.into_iter().for_each(|v| hist.add(v));
        Ok(hist)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Builder over explicit, possibly irregular, borders
#[derive(Debug, Clone)]
pub struct BorderBuilder {
    borders: Vec<f64>,
}

impl BorderBuilder {
    pub fn new(borders: Vec<f64>) -> Result<Self> {
        if borders.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "need at least two bin borders, got {}",
                borders.len()
            )));
        }
        if borders.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(Error::InvalidParameter("bin borders must be ascending".into()));
        }
        Ok(Self { borders })
    }

    /// Reuse the borders of an existing histogram
    pub fn like(hist: &Histogram) -> Result<Self> {
        Self::new(hist.borders().to_vec())
    }

    pub fn empty(&self) -> Histogram {
        Histogram::with_borders(self.borders.clone())
    }
}

impl HistogramBuilder for BorderBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        self.build_from_iter(sample.iter().copied())
    }

    fn build_from_iter<I>(&self, samples: I) -> Result<Histogram>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut hist = self.empty();
        samples.into_iter().for_each(|v| hist.add(v));
        Ok(hist)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.borders.len() - 1)
    }
}

/// Equal-width bins over the data range, padded by [`RANGE_PADDING`] of the
/// span on each side
#[derive(Debug, Clone, Copy)]
pub struct AutoRangeBuilder {
    num_bins: usize,
}

impl AutoRangeBuilder {
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }
}

impl HistogramBuilder for AutoRangeBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        let (lower, upper) = padded_range(sample.iter().copied())
            .ok_or_else(|| Error::empty_input("automatic histogram range"))?;
        FixedWidthBuilder::new(self.num_bins, lower, upper)?.build(sample)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Minimum and maximum of the finite values, `None` if there are none
pub fn data_range<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen a `(min, max)` pair by [`RANGE_PADDING`] of its span on each side
///
/// A zero span is widened by half a unit so the range never collapses.
pub fn pad_range((lower, upper): (f64, f64)) -> (f64, f64) {
    let span = upper - lower;
    let pad = if span > 0.0 { RANGE_PADDING * span } else { 0.5 };
    (lower - pad, upper + pad)
}

/// [`data_range`] followed by [`pad_range`]
pub fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    data_range(values).map(pad_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_width() {
        let builder = FixedWidthBuilder::new(4, 0.0, 4.0).unwrap();
        let hist = builder.build(&[0.1, 1.1, 1.2, 3.9, 4.0, -1.0]).unwrap();

        assert_eq!(hist.data(), &[1.0, 2.0, 0.0, 1.0]);
        assert_eq!(hist.above(), 1.0);
        assert_eq!(hist.below(), 1.0);
        assert_eq!(HistogramBuilder::target_bins(&builder), Some(4));
    }

    #[test]
    fn test_fixed_width_rejects_bad_parameters() {
        assert!(FixedWidthBuilder::new(0, 0.0, 1.0).is_err());
        assert!(FixedWidthBuilder::new(3, 1.0, 1.0).is_err());
        assert!(FixedWidthBuilder::new(3, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_border_builder() {
        let builder = BorderBuilder::new(vec![0.0, 1.0, 10.0]).unwrap();
        let hist = builder.build_from_iter([0.5, 2.0, 9.0]).unwrap();
        assert_eq!(hist.data(), &[1.0, 2.0]);

        assert!(BorderBuilder::new(vec![1.0]).is_err());
        assert!(BorderBuilder::new(vec![0.0, 2.0, 1.0]).is_err());
        assert_eq!(BorderBuilder::like(&hist).unwrap().empty().borders(), hist.borders());
    }

    #[test]
    fn test_auto_range() {
        let data = [1.0, 2.0, 3.0, 11.0];
        let hist = AutoRangeBuilder::new(10).build(&data).unwrap();

        assert_relative_eq!(hist.lower(), 0.5);
        assert_relative_eq!(hist.upper(), 11.5);
        assert_eq!(hist.sum(), 4.0);
        assert_eq!(hist.above() + hist.below(), 0.0);

        assert!(AutoRangeBuilder::new(10).build(&[]).is_err());
    }

    #[test]
    fn test_range_helpers() {
        assert_eq!(data_range([3.0, f64::NAN, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(data_range(std::iter::empty()), None);
        assert_eq!(pad_range((2.0, 2.0)), (1.5, 2.5));
    }
}

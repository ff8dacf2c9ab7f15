//! Histogram range detection across datasets

use crate::stream::SampleStream;
use rayon::prelude::*;
use reweight_core::logging::current_dispatch;
use reweight_core::{Error, LineSource, Result};
use reweight_histogram::{data_range, pad_range};
use tracing::debug;

/// Finite minimum and maximum of one source after the equilibration skip
pub fn source_range(source: &dyn LineSource, column: usize, skip: usize) -> Result<Option<(f64, f64)>> {
    let samples = SampleStream::open(source, column)?
        .skip(skip)
        .collect::<Result<Vec<f64>>>()?;
    let range = data_range(samples);
    debug!(source = %source.name(), ?range, "data range");
    Ok(range)
}

/// Common range of all sources, padded by 5% of the span on each side
///
/// Sources are scanned in parallel; min and max are combined afterwards, so
/// the result does not depend on scheduling.
pub fn detect_bounds(
    sources: &[Box<dyn LineSource>],
    column: usize,
    skip: usize,
) -> Result<(f64, f64)> {
    let dispatch = current_dispatch();
    let ranges = sources
        .par_iter()
        .map(|source| {
            tracing::dispatcher::with_default(&dispatch, || {
                source_range(source.as_ref(), column, skip)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (lower, upper) = ranges
        .into_iter()
        .flatten()
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
        .ok_or_else(|| {
            Error::InvalidInput("no finite samples to determine the range from".into())
        })?;

    Ok(pad_range((lower, upper)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reweight_core::InMemory;

    fn boxed(name: &str, values: &[f64]) -> Box<dyn LineSource> {
        Box::new(InMemory::from_values(name, values))
    }

    #[test]
    fn test_padded_union_of_ranges() {
        let sources = vec![boxed("a", &[1.0, 4.0, 2.0]), boxed("b", &[3.0, 11.0])];
        let (lower, upper) = detect_bounds(&sources, 0, 0).unwrap();
        assert_relative_eq!(lower, 0.5);
        assert_relative_eq!(upper, 11.5);
    }

    #[test]
    fn test_skip_applies_per_source() {
        let sources = vec![boxed("a", &[-100.0, 0.0, 10.0])];
        let (lower, upper) = detect_bounds(&sources, 0, 1).unwrap();
        assert_relative_eq!(lower, -0.5);
        assert_relative_eq!(upper, 10.5);
    }

    #[test]
    fn test_no_samples() {
        let sources = vec![boxed("empty", &[])];
        assert!(detect_bounds(&sources, 0, 0).is_err());
    }
}

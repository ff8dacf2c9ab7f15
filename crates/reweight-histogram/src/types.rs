//! Core histogram type

use reweight_core::{Error, Result};
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::error;

/// A binned accumulator over `[lower, upper)`
///
/// Bins are described by `num_bins + 1` ascending borders and need not have
/// equal widths. Values outside the range go to the `above`/`below`
/// overflow accumulators. Contents are `f64` so the same type can carry
/// weighted counts and, after reweighting, log-probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    /// `num_bins + 1` ascending bin borders
    borders: Vec<f64>,
    /// content of each bin
    data: Vec<f64>,
    above: f64,
    below: f64,
    /// number of insertions that landed inside the range
    total: usize,
    /// sum of all in-range weights
    sum: f64,
    /// smallest bin content, maintained incrementally by `add`
    cur_min: f64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }
}

impl Histogram {
    /// An empty histogram with zero bins
    pub fn empty() -> Self {
        Self::default()
    }

    /// `num_bins` equal-width bins over `[lower, upper)`
    pub fn new(num_bins: usize, lower: f64, upper: f64) -> Self {
        if num_bins == 0 {
            return Self::empty();
        }

        let width = (upper - lower) / num_bins as f64;
        let mut borders: Vec<f64> = (0..num_bins).map(|i| lower + i as f64 * width).collect();
        borders.push(upper);

        Self::with_borders(borders)
    }

    /// Bins given by explicit, ascending borders
    ///
    /// Fewer than two borders yield an empty histogram.
    pub fn with_borders(borders: Vec<f64>) -> Self {
        if borders.len() < 2 {
            return Self::empty();
        }
        let data = vec![0.0; borders.len() - 1];
        Self::from_parts(borders, data)
    }

    /// Histogram with the given borders and bin contents
    ///
    /// The running sum and minimum are derived from `data`; the insertion
    /// count starts at zero.
    pub fn from_data(borders: Vec<f64>, data: Vec<f64>) -> Result<Self> {
        if borders.len() != data.len() + 1 {
            return Err(Error::size_mismatch(
                data.len() + 1,
                borders.len(),
                "histogram borders",
            ));
        }
        Ok(Self::from_parts(borders, data))
    }

    /// Assemble from borders and contents, deriving the bookkeeping
    ///
    /// Callers guarantee `borders.len() == data.len() + 1` (or both empty).
    pub(crate) fn from_parts(borders: Vec<f64>, data: Vec<f64>) -> Self {
        debug_assert!(
            (borders.is_empty() && data.is_empty()) || borders.len() == data.len() + 1
        );
        let lower = borders.first().copied().unwrap_or(0.0);
        let upper = borders.last().copied().unwrap_or(0.0);
        let sum = data.iter().sum();
        let cur_min = min_of(&data);

        Self {
            lower,
            upper,
            borders,
            data,
            above: 0.0,
            below: 0.0,
            total: 0,
            sum,
            cur_min,
        }
    }

    /// Index of the bin containing `value`, `None` outside `[lower, upper)`
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if self.data.is_empty() || !(value >= self.lower && value < self.upper) {
            return None;
        }
        // first border greater than value, minus one
        let idx = self.borders.partition_point(|&b| b <= value);
        Some(idx - 1)
    }

    /// Add `weight` to the bin containing `value`
    ///
    /// Values `>= upper` accumulate in `above`, values `< lower` in `below`.
    pub fn add_weighted(&mut self, value: f64, weight: f64) {
        if value >= self.upper {
            self.above += weight;
            return;
        }
        if value < self.lower {
            self.below += weight;
            return;
        }
        let Some(idx) = self.find_bin(value) else {
            // NaN or a degenerate zero-bin histogram
            return;
        };

        let previous = self.data[idx];
        self.data[idx] += weight;
        self.total += 1;
        self.sum += weight;

        if self.data[idx] < self.cur_min {
            self.cur_min = self.data[idx];
        } else if previous == self.cur_min {
            // the old minimum may have been this bin, rescan
            self.cur_min = min_of(&self.data);
        }
    }

    /// Add a single count for `value`
    pub fn add(&mut self, value: f64) {
        self.add_weighted(value, 1.0);
    }

    /// Number of bins
    pub fn num_bins(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Accumulated weight above the range
    pub fn above(&self) -> f64 {
        self.above
    }

    /// Accumulated weight below the range
    pub fn below(&self) -> f64 {
        self.below
    }

    /// Smallest bin content
    pub fn min(&self) -> f64 {
        self.cur_min
    }

    /// Mean bin content
    pub fn mean(&self) -> f64 {
        self.sum / self.data.len() as f64
    }

    /// Sum of all bins (equal to `count()` for unit weights)
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of in-range insertions
    pub fn count(&self) -> usize {
        self.total
    }

    /// Bin borders, one more than bins
    pub fn borders(&self) -> &[f64] {
        &self.borders
    }

    /// Bin contents
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Content of bin `idx`
    pub fn at(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// Mutable content of bin `idx`
    ///
    /// Writes through this reference bypass the running statistics.
    pub fn at_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.data[idx]
    }

    /// Midpoint of each bin
    pub fn centers(&self) -> Vec<f64> {
        self.borders.windows(2).map(|b| (b[0] + b[1]) / 2.0).collect()
    }

    /// Set every bin to zero and clear the statistics
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|d| *d = 0.0);
        self.above = 0.0;
        self.below = 0.0;
        self.total = 0;
        self.sum = 0.0;
        self.cur_min = min_of(&self.data);
    }

    /// Drop empty bins from both ends
    ///
    /// A histogram without any non-empty bin ends up with zero bins; this is
    /// logged and not treated as an error, so check [`Histogram::num_bins`]
    /// afterwards.
    pub fn trim(&mut self) {
        let first = self.data.iter().position(|&d| d != 0.0);
        let last = self.data.iter().rposition(|&d| d != 0.0);

        let (left, right) = match (first, last) {
            (Some(first), Some(last)) => (first, last + 1),
            _ => {
                error!("The histogram is empty after trimming");
                let (above, below) = (self.above, self.below);
                *self = Self::empty();
                self.above = above;
                self.below = below;
                return;
            }
        };

        if left == 0 && right == self.data.len() {
            return;
        }

        self.borders = self.borders[left..=right].to_vec();
        self.data = self.data[left..right].to_vec();
        self.lower = self.borders[0];
        self.upper = self.borders[self.borders.len() - 1];
        self.cur_min = min_of(&self.data);
    }

    /// Whether `other` uses exactly the same borders
    pub fn same_borders(&self, other: &Histogram) -> bool {
        self.borders == other.borders
    }

    /// Whether the binning matches `num_bins` bins over `[lower, upper)`,
    /// bounds compared with absolute tolerance `tol`
    pub fn matches_geometry(&self, num_bins: usize, lower: f64, upper: f64, tol: f64) -> bool {
        self.num_bins() == num_bins
            && (self.lower - lower).abs() <= tol
            && (self.upper - upper).abs() <= tol
    }

    /// Two-column `center content` table with a header line
    pub fn ascii_table(&self) -> String {
        let mut table = String::from("# centers counts\n");
        for (c, d) in self.centers().iter().zip(&self.data) {
            table.push_str(&format!("{c} {d}\n"));
        }
        table
    }
}

fn min_of(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

impl Index<f64> for Histogram {
    type Output = f64;

    /// Content of the bin holding `value`, or the matching overflow
    fn index(&self, value: f64) -> &f64 {
        if value >= self.upper {
            return &self.above;
        }
        match self.find_bin(value) {
            Some(idx) => &self.data[idx],
            None => &self.below,
        }
    }
}

impl IndexMut<f64> for Histogram {
    fn index_mut(&mut self, value: f64) -> &mut f64 {
        if value >= self.upper {
            return &mut self.above;
        }
        match self.find_bin(value) {
            Some(idx) => &mut self.data[idx],
            None => &mut self.below,
        }
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (b, d) in self.borders.windows(2).zip(&self.data) {
            writeln!(f, "[{} - {}] :{}", b[0], b[1], d)?;
        }
        write!(f, "] ")
    }
}

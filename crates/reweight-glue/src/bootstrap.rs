//! Bootstrap error estimation for glued histograms
//!
//! Each bootstrap sample redraws every dataset with replacement, rebuilds
//! its histogram on the shared borders and glues the set. The spread of the
//! glued values per bin is the error estimate.

use crate::engine::Glue;
use rand::prelude::*;
use rayon::prelude::*;
use reweight_core::logging::current_dispatch;
use reweight_core::stats::{mean, sdev};
use reweight_core::{Error, Result};
use reweight_histogram::Histogram;
use tracing::{debug, instrument};

/// Draws bootstrap histogram sets from decorrelated sample series
///
/// Sample `i` always uses `StdRng::seed_from_u64(seed + i)`, so the sets do
/// not depend on how the work is spread over threads.
#[derive(Debug, Clone)]
pub struct Resampler {
    n_resamples: usize,
    seed: Option<u64>,
}

impl Resampler {
    pub fn new(n_resamples: usize) -> Self {
        Self {
            n_resamples,
            seed: None,
        }
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    /// One resampled histogram per dataset for bootstrap sample `index`
    pub fn resample(
        &self,
        seed: u64,
        index: usize,
        series: &[Vec<f64>],
        borders: &[f64],
    ) -> Vec<Histogram> {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
        series
            .iter()
            .map(|samples| {
                let mut hist = Histogram::with_borders(borders.to_vec());
                for _ in 0..samples.len() {
                    hist.add(samples[rng.gen_range(0..samples.len())]);
                }
                hist
            })
            .collect()
    }

    /// All bootstrap sets, in sample order
    #[instrument(skip(self, series, borders), fields(n_datasets = series.len(), n_resamples = self.n_resamples))]
    pub fn resample_sets(&self, series: &[Vec<f64>], borders: &[f64]) -> Result<Vec<Vec<Histogram>>> {
        if self.n_resamples == 0 {
            return Err(Error::InvalidParameter(
                "Number of resamples must be positive".into(),
            ));
        }
        if series.is_empty() {
            return Err(Error::empty_input("bootstrap resampling"));
        }
        if let Some(i) = series.iter().position(|s| s.is_empty()) {
            return Err(Error::InvalidInput(format!(
                "dataset {i} has no samples to resample"
            )));
        }

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(seed, "Generating bootstrap histogram sets");

        let dispatch = current_dispatch();
        Ok((0..self.n_resamples)
            .into_par_iter()
            .map(|i| {
                tracing::dispatcher::with_default(&dispatch, || {
                    self.resample(seed, i, series, borders)
                })
            })
            .collect())
    }
}

/// Per-bin mean and standard deviation over the bootstrap samples
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapTable {
    pub centers: Vec<f64>,
    pub means: Vec<f64>,
    pub stdevs: Vec<f64>,
}

impl BootstrapTable {
    /// `center value error` table with a header line
    pub fn to_table(&self) -> String {
        let mut table = String::from("# centers count error\n");
        for ((c, v), e) in self.centers.iter().zip(&self.means).zip(&self.stdevs) {
            table.push_str(&format!("{c} {v} {e}\n"));
        }
        table
    }
}

/// Glue every set and aggregate the results bin by bin
///
/// The sets are glued in parallel; a failing set fails the whole estimate.
/// Bins that are NaN in any sample stay NaN.
#[instrument(skip(sets, glue), fields(n_samples = sets.len()))]
pub fn bootstrap_glue(sets: &[Vec<Histogram>], glue: &Glue) -> Result<BootstrapTable> {
    let first = sets
        .first()
        .and_then(|set| set.first())
        .ok_or_else(|| Error::empty_input("bootstrap glue"))?;
    let centers = first.centers();
    let num_bins = first.num_bins();

    let dispatch = current_dispatch();
    let glued = sets
        .par_iter()
        .map(|set| tracing::dispatcher::with_default(&dispatch, || glue.glue(set)))
        .collect::<Result<Vec<_>>>()?;

    debug!("Bootstrap completed, aggregating {} bins", num_bins);

    let mut means = Vec::with_capacity(num_bins);
    let mut stdevs = Vec::with_capacity(num_bins);
    let mut column = Vec::with_capacity(glued.len());
    for j in 0..num_bins {
        column.clear();
        column.extend(glued.iter().map(|g| g.histogram.at(j)));
        means.push(mean(&column));
        stdevs.push(sdev(&column));
    }

    Ok(BootstrapTable {
        centers,
        means,
        stdevs,
    })
}

//! Orchestration of a full reweighting run
//!
//! Bounds are fixed first (configured or detected over all datasets). Then
//! every dataset is read, decorrelated and binned in parallel, and the
//! histograms are glued on the calling thread. With bootstrap samples
//! configured, resampled histogram sets are glued as well and the output
//! table carries per-bin errors.

use crate::cache;
use crate::config::GlueConfig;
use crate::decorrelate::{decorrelate, determine_stride};
use crate::output::write_out;
use crate::stream::read_samples;
use crate::bounds::detect_bounds;
use rayon::prelude::*;
use reweight_core::logging::current_dispatch;
use reweight_core::{source_for_path, Error, LineSource, LogContext, Result};
use reweight_glue::{bootstrap_glue, BootstrapTable, Glue, GlueResult, Resampler};
use reweight_histogram::{FixedWidthBuilder, Histogram, HistogramBuilder};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct GlueOutcome {
    /// Histogram built from each dataset, in input order
    pub inputs: Vec<Histogram>,
    /// Point estimate of the glued log-density
    pub glued: GlueResult,
    /// Per-bin errors when bootstrapping was enabled
    pub bootstrap: Option<BootstrapTable>,
}

impl GlueOutcome {
    /// Normalized log-density
    pub fn histogram(&self) -> &Histogram {
        &self.glued.histogram
    }

    /// Cumulative shift constants, one per dataset
    pub fn shifts(&self) -> &[f64] {
        &self.glued.shifts
    }

    /// The result table: `center value error` with bootstrap errors,
    /// otherwise `center count`
    pub fn table(&self) -> String {
        match &self.bootstrap {
            Some(table) => table.to_table(),
            None => self.glued.histogram.ascii_table(),
        }
    }

    /// Raw input histograms, one table per dataset
    pub fn input_table(&self) -> String {
        self.inputs.iter().map(Histogram::ascii_table).collect()
    }

    /// Shifted bias-corrected series, datasets separated by a blank line
    pub fn corrected_table(&self) -> String {
        self.glued.corrected_table()
    }
}

/// A configured reweighting run
pub struct Pipeline {
    config: GlueConfig,
    log: LogContext,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Pipeline {
    /// Build a pipeline; a dedicated thread pool is created when
    /// `config.threads` is set
    pub fn new(config: GlueConfig, log: LogContext) -> Result<Self> {
        let pool = match config.threads {
            Some(threads) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?,
            )),
            None => None,
        };
        Ok(Self { config, log, pool })
    }

    pub fn config(&self) -> &GlueConfig {
        &self.config
    }

    /// Sources for the configured input files, checked for readability
    pub fn open_inputs(&self) -> Result<Vec<Box<dyn LineSource>>> {
        open_paths(&self.config.inputs)
    }

    /// Run over the configured input files and write the table to the
    /// configured output
    pub fn run_files(&self) -> Result<GlueOutcome> {
        self.config.check_output()?;
        let sources = self.open_inputs()?;
        let outcome = self.run(&sources)?;
        write_out(&self.config.output, &outcome.table())?;
        Ok(outcome)
    }

    /// Run over `sources`, one per dataset, in the order of the thetas
    pub fn run(&self, sources: &[Box<dyn LineSource>]) -> Result<GlueOutcome> {
        let dispatch = self.log.dispatch()?;
        let work = || tracing::dispatcher::with_default(&dispatch, || self.run_in_scope(sources));
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    #[instrument(skip_all, fields(n_datasets = sources.len()))]
    fn run_in_scope(&self, sources: &[Box<dyn LineSource>]) -> Result<GlueOutcome> {
        let config = &self.config;
        config.validate(sources.len())?;
        config.log_summary();

        let (lower, upper) = self.bounds(sources)?;
        info!("range               [{lower}:{upper}]");
        let builder = FixedWidthBuilder::new(config.num_bins, lower, upper)?;
        let glue = Glue::new(config.threshold).with_thetas(config.thetas.clone());

        let dispatch = current_dispatch();
        if config.bootstrap_samples == 0 {
            let inputs = sources
                .par_iter()
                .map(|source| {
                    tracing::dispatcher::with_default(&dispatch, || {
                        self.point_histogram(source.as_ref(), &builder)
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let glued = glue.glue(&inputs)?;
            return Ok(GlueOutcome {
                inputs,
                glued,
                bootstrap: None,
            });
        }

        let series = sources
            .par_iter()
            .map(|source| {
                tracing::dispatcher::with_default(&dispatch, || self.samples(source.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;

        let inputs = series
            .iter()
            .map(|samples| builder.build(samples))
            .collect::<Result<Vec<_>>>()?;
        let glued = glue.glue(&inputs)?;

        let mut resampler = Resampler::new(config.bootstrap_samples);
        if let Some(seed) = config.seed {
            resampler = resampler.with_seed(seed);
        }
        let sets = resampler.resample_sets(&series, builder.empty().borders())?;
        let table = bootstrap_glue(&sets, &glue)?;

        Ok(GlueOutcome {
            inputs,
            glued,
            bootstrap: Some(table),
        })
    }

    /// Configured bounds, or the padded range of the border files (the
    /// inputs when none are given)
    fn bounds(&self, sources: &[Box<dyn LineSource>]) -> Result<(f64, f64)> {
        if let Some(bounds) = self.config.bounds {
            return Ok(bounds);
        }
        if self.config.border_files.is_empty() {
            detect_bounds(sources, self.config.column, self.config.skip)
        } else {
            let border_sources = open_paths(&self.config.border_files)?;
            detect_bounds(&border_sources, self.config.column, self.config.skip)
        }
    }

    /// Decorrelated samples of one dataset
    fn samples(&self, source: &dyn LineSource) -> Result<Vec<f64>> {
        let config = &self.config;
        let samples = read_samples(source, config.column, config.skip, config.stride)?;
        if samples.is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} has no samples after skipping {}",
                source.name(),
                config.skip
            )));
        }
        if config.stride > 0 {
            return Ok(samples);
        }

        let stride = determine_stride(&samples)?;
        info!(source = %source.name(), stride, "decorrelating");
        Ok(decorrelate(&samples, stride))
    }

    /// Histogram of one dataset, from the cache when it matches
    fn point_histogram(&self, source: &dyn LineSource, builder: &FixedWidthBuilder) -> Result<Histogram> {
        let config = &self.config;
        let cached = config
            .cache_dir
            .as_ref()
            .map(|dir| cache::cache_path(dir, &source.name()));

        if let (Some(path), false) = (&cached, config.force) {
            if let Some(hist) =
                cache::load_matching(path, config.num_bins, builder.lower(), builder.upper())?
            {
                return Ok(hist);
            }
        }

        let hist = builder.build(&self.samples(source)?)?;
        debug!(
            source = %source.name(),
            count = hist.count(),
            above = hist.above(),
            below = hist.below(),
            "histogram built"
        );
        if let Some(path) = &cached {
            cache::store(path, &hist)?;
        }
        Ok(hist)
    }
}

/// Open every path once to report unreadable inputs before any work starts
fn open_paths(paths: &[std::path::PathBuf]) -> Result<Vec<Box<dyn LineSource>>> {
    paths
        .iter()
        .map(|path| {
            let source = source_for_path(path);
            source.open()?;
            Ok(source)
        })
        .collect()
}

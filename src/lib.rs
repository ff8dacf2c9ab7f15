//! # Reweight
//!
//! Turns time series from biased Monte-Carlo simulations (different
//! temperatures, artificial sampling weights) into one unbiased, normalized
//! distribution of the observable, with optional bootstrap error bars.
//!
//! ## Crates
//!
//! - [`core`]: error type, statistics helpers, logging context, line sources
//! - [`histogram`]: border based histograms and their text format
//! - [`autocorr`]: FFT autocorrelation time for decorrelation
//! - [`glue`]: bias correction, shift constants, merge and normalization
//! - [`pipeline`]: configuration and the parallel end-to-end run
//!
//! ## Quick Start
//!
//! ```rust
//! use reweight::prelude::*;
//!
//! let mut hist = Histogram::new(4, 0.0, 4.0);
//! for v in [0.5, 1.5, 1.5, 2.5, 2.5, 3.5] {
//!     hist.add(v);
//! }
//!
//! let glued = Glue::new(0.0).with_thetas(vec![2.0]).glue(&[hist]).unwrap();
//! print!("{}", glued.histogram.ascii_table());
//! ```

pub use reweight_autocorr as autocorr;
pub use reweight_core as core;
pub use reweight_glue as glue;
pub use reweight_histogram as histogram;
pub use reweight_pipeline as pipeline;

pub use reweight_core::{Error, Result};

/// The types most runs need
pub mod prelude {
    pub use reweight_autocorr::{autocorrelation_time, AutocorrelationEstimator};
    pub use reweight_core::{
        source_for_path, Error, InMemory, LineSource, LogContext, Result, Verbosity,
    };
    pub use reweight_glue::{bootstrap_glue, glue_histograms, BootstrapTable, Glue, GlueResult, Resampler};
    pub use reweight_histogram::{
        AutoRangeBuilder, BorderBuilder, FixedWidthBuilder, Histogram, HistogramBuilder,
    };
    pub use reweight_pipeline::{GlueConfig, GlueOutcome, Pipeline, SampleStream};
}

//! # Reweight Glue
//!
//! Multi-histogram reweighting of biased Monte-Carlo histograms.
//!
//! Every input histogram was sampled under its own bias (a temperature
//! `theta`, or no bias at all). Gluing proceeds in four steps:
//!
//! 1. undo the bias per bin in log space, `s = c / theta + ln n`
//! 2. estimate the log offset between neighbouring inputs from the bins where
//!    both have more than `threshold` counts
//! 3. average the aligned inputs bin by bin
//! 4. normalize so the trapezoidal area of `exp(value)` is one
//!
//! The bootstrap module repeats this over resampled data to estimate per-bin
//! errors.
//!
//! ```
//! use reweight_glue::glue_histograms;
//! use reweight_histogram::Histogram;
//!
//! let mut hist = Histogram::new(3, 0.0, 3.0);
//! for v in [0.5, 1.5, 1.6, 2.5] {
//!     hist.add(v);
//! }
//! let glued = glue_histograms(&[hist.clone(), hist], &[1.0, 1.0], 0.0).unwrap();
//! assert_eq!(glued.num_bins(), 3);
//! ```

pub mod bootstrap;
pub mod correction;
pub mod engine;
pub mod shift;

pub use bootstrap::{bootstrap_glue, BootstrapTable, Resampler};
pub use correction::{correct_bias, corrected_series, BiasModel};
pub use engine::{glue_histograms, log_area, Glue, GlueResult};
pub use shift::{cumulative_shifts, pairwise_shift};

pub use reweight_core::{Error, Result};

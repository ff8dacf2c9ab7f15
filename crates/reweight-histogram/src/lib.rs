//! Binned accumulators for Monte-Carlo time series
//!
//! This crate provides the [`Histogram`] used throughout the reweighting
//! workspace: a bin-border based accumulator with overflow counters, a
//! running minimum, trimming, and a plain two-line text format.
//!
//! # Examples
//!
//! ## Filling and Inspecting
//!
//! ```rust
//! use reweight_histogram::Histogram;
//!
//! let mut hist = Histogram::new(5, 0.0, 10.0);
//! for v in [0.5, 2.1, 2.2, 9.9, 12.0] {
//!     hist.add(v);
//! }
//!
//! assert_eq!(hist.data(), &[1.0, 2.0, 0.0, 0.0, 1.0]);
//! assert_eq!(hist.above(), 1.0);
//! assert_eq!(hist[2.15], 2.0);
//! print!("{}", hist.ascii_table());
//! ```
//!
//! ## Builders
//!
//! ```rust
//! use reweight_histogram::{AutoRangeBuilder, HistogramBuilder};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! let hist = AutoRangeBuilder::new(4).build(&data).unwrap();
//! assert_eq!(hist.sum(), 5.0);
//! ```
//!
//! ## Persistence
//!
//! ```rust
//! use reweight_histogram::Histogram;
//!
//! let hist: Histogram = "0 1 2\n3 4\n".parse().unwrap();
//! assert_eq!(hist.to_persisted(), "0 1 2\n3 4\n");
//! ```

pub mod builders;
pub mod persist;
pub mod traits;
pub mod types;

pub use builders::{
    data_range, pad_range, padded_range, AutoRangeBuilder, BorderBuilder, FixedWidthBuilder,
};
pub use traits::HistogramBuilder;
pub use types::Histogram;

pub use reweight_core::{Error, Result};

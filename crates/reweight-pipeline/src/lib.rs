//! # Reweight Pipeline
//!
//! Drives the reweighting crates from raw Monte-Carlo time series to the
//! final table:
//!
//! - [`GlueConfig`]: the settings of a run, JSON (de)serializable
//! - [`SampleStream`]: numbers from one column of a plain or gzip text source
//! - [`detect_bounds`]: common histogram range over all datasets
//! - [`determine_stride`]: decorrelation stride from the autocorrelation time
//! - [`cache`]: reuse of previously built histograms
//! - [`Pipeline`]: parallel per-dataset work followed by gluing
//!
//! ```
//! use reweight_core::{InMemory, LineSource, LogContext};
//! use reweight_pipeline::{GlueConfig, Pipeline};
//!
//! let sources: Vec<Box<dyn LineSource>> = vec![
//!     Box::new(InMemory::from_values("a", &[0.1, 0.2, 0.4, 0.5, 0.6, 0.9])),
//! ];
//! let config = GlueConfig::new()
//!     .with_num_bins(2)
//!     .with_bounds(0.0, 1.0)
//!     .with_stride(1)
//!     .with_threshold(0.0)
//!     .with_thetas(vec![1.0]);
//!
//! let outcome = Pipeline::new(config, LogContext::silent())
//!     .unwrap()
//!     .run(&sources)
//!     .unwrap();
//! assert_eq!(outcome.histogram().num_bins(), 2);
//! assert!(outcome.table().starts_with("# centers counts\n"));
//! ```

pub mod bounds;
pub mod cache;
pub mod config;
pub mod decorrelate;
pub mod output;
pub mod pipeline;
pub mod stream;

pub use bounds::detect_bounds;
pub use config::GlueConfig;
pub use decorrelate::{decorrelate, determine_stride};
pub use output::write_out;
pub use pipeline::{GlueOutcome, Pipeline};
pub use stream::{read_samples, SampleStream};

pub use reweight_core::{Error, Result};

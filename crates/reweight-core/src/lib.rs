//! Core types for histogram reweighting
//!
//! This crate holds what every other reweight crate shares:
//!
//! - [`Error`] and [`Result`], the single error type of the workspace
//! - [`stats`], stateless numeric helpers (means, variances, trapezoidal rule)
//! - [`logging`], the explicitly passed logging context
//! - [`source`], restartable line sources over plain and gzip files
//!
//! # Example
//!
//! ```rust
//! use reweight_core::stats::{trapz, weighted_mean};
//!
//! let x = [0.0, 1.0, 2.0];
//! let y = [1.0, 1.0, 1.0];
//! assert_eq!(trapz(&x, &y).unwrap(), 2.0);
//!
//! let m = weighted_mean(&[1.0, 3.0], &[1.0, 1.0]).unwrap();
//! assert_eq!(m, 2.0);
//! ```

pub mod error;
pub mod logging;
pub mod source;
pub mod stats;

pub use error::{Error, Result};
pub use logging::{LogContext, Verbosity};
pub use source::{open_text, source_for_path, GzipFile, InMemory, LineSource, PlainFile};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

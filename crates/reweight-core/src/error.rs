//! Error types for histogram reweighting
//!
//! Provides a unified error type for all reweight crates.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reweighting operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Histograms that must share a binning do not
    #[error("Border mismatch: histogram {index} does not share the borders of histogram 0")]
    BorderMismatch { index: usize },

    /// A persisted histogram could not be parsed
    #[error("Malformed histogram {source_name}: {reason}")]
    MalformedHistogram { source_name: String, reason: String },

    /// An input path could not be opened or read
    #[error("Can not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output path could not be created or written
    #[error("Can not write {path}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error (for stream operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(_operation: &str) -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for an unparsable persisted histogram
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHistogram {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error class
    ///
    /// Configuration problems exit with 2, unreadable inputs with 3,
    /// unwritable outputs with 4 and malformed histograms with 5.
    /// Everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidParameter(_)
            | Self::InvalidInput(_)
            | Self::InsufficientData { .. }
            | Self::BorderMismatch { .. } => 2,
            Self::Unreadable { .. } => 3,
            Self::Unwritable { .. } => 4,
            Self::MalformedHistogram { .. } => 5,
            Self::Computation(_) | Self::Execution(_) | Self::Io(_) | Self::Other(_) => 1,
        }
    }
}

//! Run configuration
//!
//! Everything a command line front end would collect, as plain values. The
//! struct deserializes from JSON with every field optional.

use reweight_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration of one reweighting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlueConfig {
    /// Sample files, one per biased dataset
    pub inputs: Vec<PathBuf>,
    /// Files to detect the bounds from instead of `inputs`
    pub border_files: Vec<PathBuf>,
    /// Result target; empty or `-` means stdout
    pub output: String,
    pub num_bins: usize,
    /// `(lower, upper)`, detected from the data when `None`
    pub bounds: Option<(f64, f64)>,
    /// Zero-based whitespace-separated column holding the observable
    pub column: usize,
    /// Samples to drop at the start of every dataset (equilibration)
    pub skip: usize,
    /// Keep every `stride`-th sample; 0 detects it from the autocorrelation
    pub stride: usize,
    /// Minimum bin count for a bin to take part in gluing
    pub threshold: f64,
    /// Temperature per dataset; empty for unbiased inputs
    pub thetas: Vec<f64>,
    /// Bootstrap samples; 0 disables error estimation
    pub bootstrap_samples: usize,
    /// Ignore cached histograms
    pub force: bool,
    pub seed: Option<u64>,
    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,
    /// Where point-estimate histograms are cached; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            border_files: Vec::new(),
            output: String::new(),
            num_bins: 100,
            bounds: None,
            column: 0,
            skip: 0,
            stride: 0,
            threshold: 100.0,
            thetas: Vec::new(),
            bootstrap_samples: 0,
            force: false,
            seed: None,
            threads: None,
            cache_dir: None,
        }
    }
}

impl GlueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::InvalidParameter(format!("invalid configuration: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.into()))
    }

    pub fn with_inputs<P: Into<PathBuf>>(mut self, inputs: impl IntoIterator<Item = P>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_border_files<P: Into<PathBuf>>(
        mut self,
        files: impl IntoIterator<Item = P>,
    ) -> Self {
        self.border_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.bounds = Some((lower, upper));
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_thetas(mut self, thetas: Vec<f64>) -> Self {
        self.thetas = thetas;
        self
    }

    pub fn with_bootstrap_samples(mut self, samples: usize) -> Self {
        self.bootstrap_samples = samples;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Check the configuration for a run over `n_datasets` inputs
    pub fn validate(&self, n_datasets: usize) -> Result<()> {
        if n_datasets == 0 {
            return Err(Error::InvalidParameter("You need at least one input file".into()));
        }
        if self.num_bins == 0 {
            return Err(Error::InvalidParameter("number of bins must be positive".into()));
        }
        if let Some((lower, upper)) = self.bounds {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(Error::InvalidParameter(format!(
                    "invalid range [{lower}, {upper})"
                )));
            }
        }
        if self.threshold.is_nan() {
            return Err(Error::InvalidParameter("threshold is NaN".into()));
        }
        if !self.thetas.is_empty() && self.thetas.len() != n_datasets {
            return Err(Error::size_mismatch(n_datasets, self.thetas.len(), "theta list"));
        }
        if self.thetas.iter().any(|t| !t.is_finite() || *t == 0.0) {
            return Err(Error::InvalidParameter(
                "every theta must be finite and non-zero".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidParameter("number of threads must be positive".into()));
        }
        Ok(())
    }

    /// Whether results go to stdout
    pub fn writes_to_stdout(&self) -> bool {
        self.output.is_empty() || self.output == "-"
    }

    /// Make sure the output file can be opened before any work is done
    pub fn check_output(&self) -> Result<()> {
        if self.writes_to_stdout() {
            return Ok(());
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .map(drop)
            .map_err(|source| Error::Unwritable {
                path: PathBuf::from(&self.output),
                source,
            })
    }

    /// Log the effective settings at info level
    pub fn log_summary(&self) {
        match self.bounds {
            Some((lower, upper)) => info!("range               [{lower}:{upper}]"),
            None => info!("range               detected from the data"),
        }
        info!("num bins            {}", self.num_bins);
        info!("column              {}", self.column);
        info!("skip                {}", self.skip);
        if self.stride == 0 {
            info!("stride              from autocorrelation");
        } else {
            info!("stride              {}", self.stride);
        }
        info!("threshold           {}", self.threshold);
        info!("thetas              {:?}", self.thetas);
        info!("bootstrap samples   {}", self.bootstrap_samples);
        info!("force reread        {}", self.force);
        if let Some(threads) = self.threads {
            info!("threads             {threads}");
        }
        if !self.writes_to_stdout() {
            info!("target path         {}", self.output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = GlueConfig::new()
            .with_num_bins(50)
            .with_bounds(-1.0, 1.0)
            .with_thetas(vec![1.0, 2.0])
            .with_seed(3);

        assert_eq!(config.num_bins, 50);
        assert_eq!(config.bounds, Some((-1.0, 1.0)));
        assert_eq!(config.threshold, 100.0);
        assert_eq!(config.stride, 0);
        assert_eq!(config.seed, Some(3));
        assert!(config.writes_to_stdout());
    }

    #[test]
    fn test_json_with_missing_fields() {
        let config = GlueConfig::from_json_str(
            r#"{ "num_bins": 20, "bounds": [0.0, 10.0], "thetas": [1.0, 2.0], "inputs": ["a.dat", "b.dat.gz"] }"#,
        )
        .unwrap();

        assert_eq!(config.num_bins, 20);
        assert_eq!(config.bounds, Some((0.0, 10.0)));
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.column, 0);
        assert!(config.validate(2).is_ok());

        let back = GlueConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);

        assert!(GlueConfig::from_json_str("{ \"num_bins\": -1 }").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let config = GlueConfig::new();
        assert!(config.validate(0).is_err());
        assert!(config.validate(3).is_ok());

        let mismatch = GlueConfig::new().with_thetas(vec![1.0, 2.0]);
        let err = mismatch.validate(3).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        assert!(GlueConfig::new().with_thetas(vec![0.0]).validate(1).is_err());
        assert!(GlueConfig::new().with_bounds(2.0, 1.0).validate(1).is_err());
        assert!(GlueConfig::new().with_num_bins(0).validate(1).is_err());
        assert!(GlueConfig::new().with_threads(0).validate(1).is_err());
    }

    #[test]
    fn test_unwritable_output() {
        let config = GlueConfig::new().with_output("/nonexistent-dir/reweight/out.dat");
        let err = config.check_output().unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}

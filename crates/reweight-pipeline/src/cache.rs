//! On-disk cache of point-estimate histograms

use reweight_core::{Error, Result};
use reweight_histogram::Histogram;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Absolute tolerance on the bounds of a cached histogram
pub const BOUND_TOLERANCE: f64 = 0.1;

/// Cache file for a source: `<dir>/<escaped source name>.hist`
///
/// The whole source name goes into the file name, so `T1/energy.dat` and
/// `T2/energy.dat` get separate entries. `%` and path separators are
/// percent-escaped, which keeps distinct names distinct.
pub fn cache_path(dir: &Path, source_name: &str) -> PathBuf {
    let mut escaped = String::with_capacity(source_name.len());
    for c in source_name.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            ':' => escaped.push_str("%3A"),
            c => escaped.push(c),
        }
    }
    dir.join(format!("{escaped}.hist"))
}

/// The cached histogram at `path` if it matches the requested binning
///
/// A missing file or different binning is a miss. A file that exists but
/// can not be parsed is an error.
pub fn load_matching(path: &Path, num_bins: usize, lower: f64, upper: f64) -> Result<Option<Histogram>> {
    if !path.is_file() {
        return Ok(None);
    }
    let hist = Histogram::load(path)?;
    if hist.matches_geometry(num_bins, lower, upper, BOUND_TOLERANCE) {
        info!("using cached histogram {}", path.display());
        Ok(Some(hist))
    } else {
        debug!(
            "cached histogram {} has {} bins over [{}, {}), recomputing",
            path.display(),
            hist.num_bins(),
            hist.lower(),
            hist.upper()
        );
        Ok(None)
    }
}

/// Persist `hist` at `path`, creating the cache directory when needed
pub fn store(path: &Path, hist: &Histogram) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| Error::Unwritable {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    hist.save(path)?;
    debug!("cached histogram at {}", path.display());
    Ok(())
}

//! Two-line text persistence
//!
//! Line 1 holds the `B + 1` space-separated borders, line 2 the `B` bin
//! contents. Empty lines and lines starting with `#` are skipped when
//! reading. Some producers store bin centers instead of borders; when both
//! lines have the same length the first is taken as centers and converted
//! using half the first bin width, which is exact only for equal-width bins.

use crate::types::Histogram;
use reweight_core::{open_text, Error, Result};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

impl Histogram {
    /// Serialize to the two-line format
    pub fn to_persisted(&self) -> String {
        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{}\n{}\n", join(self.borders()), join(self.data()))
    }

    /// Write the two-line format to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let unwritable = |source| Error::Unwritable {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(unwritable)?);
        writer
            .write_all(self.to_persisted().as_bytes())
            .map_err(unwritable)?;
        writer.flush().map_err(unwritable)
    }

    /// Read a histogram written by [`Histogram::save`]; `.gz` files are
    /// decompressed transparently
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_text(path)?;
        let hist = Self::read_from(reader, &path.display().to_string())?;
        debug!("loaded {} bins from {}", hist.num_bins(), path.display());
        Ok(hist)
    }

    /// Parse the two-line format from any reader
    pub fn read_from<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut lines = reader.lines().filter(|line| match line {
            Ok(l) => !(l.trim().is_empty() || l.starts_with('#')),
            Err(_) => true,
        });

        let border_line = lines
            .next()
            .ok_or_else(|| Error::malformed(source_name, "empty file"))??;
        let data_line = lines
            .next()
            .ok_or_else(|| Error::malformed(source_name, "only borders, no data"))??;

        let mut borders = parse_row(&border_line, source_name, "border")?;
        let data = parse_row(&data_line, source_name, "data")?;

        if borders.len() == data.len() {
            if borders.len() < 2 {
                return Err(Error::malformed(
                    source_name,
                    "need at least two centers to infer bin borders",
                ));
            }
            debug!("{source_name}: treating first line as bin centers");
            borders = centers_to_borders(&borders);
        }

        if borders.len() != data.len() + 1 {
            return Err(Error::malformed(
                source_name,
                format!(
                    "expected one more bin border than data, got {} and {}",
                    borders.len(),
                    data.len()
                ),
            ));
        }
        if borders.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(Error::malformed(source_name, "borders are not ascending"));
        }

        Ok(Self::from_parts(borders, data))
    }
}

impl FromStr for Histogram {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::read_from(s.as_bytes(), "<string>")
    }
}

fn parse_row(line: &str, source_name: &str, what: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                Error::malformed(source_name, format!("unreadable {what} value '{token}'"))
            })
        })
        .collect()
}

fn centers_to_borders(centers: &[f64]) -> Vec<f64> {
    let half_width = (centers[1] - centers[0]) / 2.0;
    let mut borders: Vec<f64> = centers.iter().map(|c| c - half_width).collect();
    borders.push(centers[centers.len() - 1] + half_width);
    borders
}

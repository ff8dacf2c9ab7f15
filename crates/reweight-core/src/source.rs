//! Restartable sources of text lines
//!
//! A [`LineSource`] hands out a fresh reader on every [`LineSource::open`],
//! so a consumer that needs two passes (bound detection, then binning) simply
//! opens it twice. Which adapter backs a path is decided once, by extension,
//! in [`source_for_path`].

use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Something that can produce the same sequence of lines again and again
pub trait LineSource: Send + Sync {
    /// Open a new reader positioned at the first line
    fn open(&self) -> Result<Box<dyn BufRead + Send>>;

    /// Human readable name used in diagnostics
    fn name(&self) -> String;
}

/// Uncompressed text file
#[derive(Debug, Clone)]
pub struct PlainFile {
    path: PathBuf,
}

impl PlainFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for PlainFile {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        let file = File::open(&self.path).map_err(|source| Error::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Gzip compressed text file
#[derive(Debug, Clone)]
pub struct GzipFile {
    path: PathBuf,
}

impl GzipFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for GzipFile {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        let file = File::open(&self.path).map_err(|source| Error::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Lines held in memory, mostly for tests and for callers that already
/// have the data
#[derive(Debug, Clone)]
pub struct InMemory {
    name: String,
    text: Arc<str>,
}

impl InMemory {
    pub fn new(name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// One sample per line
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let text: String = values.iter().map(|v| format!("{v}\n")).collect();
        Self::new(name, text)
    }
}

impl LineSource for InMemory {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes().to_vec())))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Whether `path` names a gzip file
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Pick the adapter for `path` by its extension
pub fn source_for_path(path: impl AsRef<Path>) -> Box<dyn LineSource> {
    let path = path.as_ref();
    if is_gzip(path) {
        Box::new(GzipFile::new(path))
    } else {
        Box::new(PlainFile::new(path))
    }
}

/// Open `path` for reading, decompressing `.gz` files on the fly
pub fn open_text(path: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send>> {
    source_for_path(path).open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reweight-source-{}-{name}", std::process::id()))
    }

    fn read_all(source: &dyn LineSource) -> Vec<String> {
        source.open().unwrap().lines().map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_in_memory_is_restartable() {
        let source = InMemory::from_values("mem", &[1.0, 2.5]);
        assert_eq!(read_all(&source), vec!["1", "2.5"]);
        assert_eq!(read_all(&source), vec!["1", "2.5"]);
        assert_eq!(source.name(), "mem");
    }

    #[test]
    fn test_gzip_and_plain_agree() {
        let plain = temp_path("plain.dat");
        let gz = temp_path("packed.dat.gz");
        let text = "# header\n1 2\n3 4\n";

        std::fs::write(&plain, text).unwrap();
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert!(is_gzip(&gz));
        assert!(!is_gzip(&plain));
        assert_eq!(
            read_all(source_for_path(&plain).as_ref()),
            read_all(source_for_path(&gz).as_ref())
        );

        let _ = std::fs::remove_file(plain);
        let _ = std::fs::remove_file(gz);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = open_text(temp_path("does-not-exist.dat")).err().unwrap();
        assert!(matches!(err, Error::Unreadable { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}

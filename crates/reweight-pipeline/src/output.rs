//! Result output

use reweight_core::{Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Write `text` to `target`
///
/// An empty target or `-` writes to stdout. Anything else is a file the
/// text is appended to.
pub fn write_out(target: &str, text: &str) -> Result<()> {
    if target.is_empty() || target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let unwritable = |source| Error::Unwritable {
        path: PathBuf::from(target),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)
        .map_err(unwritable)?;
    file.write_all(text.as_bytes()).map_err(unwritable)
}

//! Lazy numeric sample streams over line sources

use reweight_core::{Error, LineSource, Result};
use std::io::{BufRead, Lines};

/// Samples from one column of a text source
///
/// Empty lines and lines starting with `#` are skipped. Every other line
/// must have the requested whitespace-separated column holding a number.
/// Equilibration skip and striding are ordinary iterator adapters:
///
/// ```
/// use reweight_core::InMemory;
/// use reweight_pipeline::SampleStream;
///
/// let source = InMemory::new("mem", "# t  e\n0 1.5\n1 2.5\n2 3.5\n3 4.5\n");
/// let samples: Vec<f64> = SampleStream::open(&source, 1)
///     .unwrap()
///     .skip(1)
///     .step_by(2)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(samples, vec![2.5, 4.5]);
/// ```
pub struct SampleStream<R> {
    lines: Lines<R>,
    column: usize,
    name: String,
    line_no: usize,
}

impl SampleStream<Box<dyn BufRead + Send>> {
    /// Open a fresh stream over `source`
    pub fn open(source: &dyn LineSource, column: usize) -> Result<Self> {
        Ok(Self::new(source.open()?, column, source.name()))
    }
}

impl<R: BufRead> SampleStream<R> {
    pub fn new(reader: R, column: usize, name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            column,
            name: name.into(),
            line_no: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<f64> {
        let token = line.split_whitespace().nth(self.column).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{}:{}: no column {}",
                self.name, self.line_no, self.column
            ))
        })?;
        token.parse().map_err(|_| {
            Error::InvalidInput(format!(
                "{}:{}: can not parse '{token}' as a number",
                self.name, self.line_no
            ))
        })
    }
}

impl<R: BufRead> Iterator for SampleStream<R> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(self.parse(trimmed));
        }
    }
}

/// All samples of `source` after dropping `skip` and keeping every
/// `stride`-th one (0 and 1 keep all)
pub fn read_samples(
    source: &dyn LineSource,
    column: usize,
    skip: usize,
    stride: usize,
) -> Result<Vec<f64>> {
    SampleStream::open(source, column)?
        .skip(skip)
        .step_by(stride.max(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reweight_core::InMemory;

    #[test]
    fn test_skip_and_stride() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let source = InMemory::from_values("ten", &values);

        assert_eq!(read_samples(&source, 0, 0, 0).unwrap(), values);
        assert_eq!(read_samples(&source, 0, 3, 1).unwrap(), vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(read_samples(&source, 0, 2, 3).unwrap(), vec![2.0, 5.0, 8.0]);
        assert!(read_samples(&source, 0, 20, 1).unwrap().is_empty());
    }

    #[test]
    fn test_comments_and_columns() {
        let source = InMemory::new("cols", "# sweep energy\n\n1 -2.5\n  # indented comment\n2\t-3.5e1\n");
        assert_eq!(read_samples(&source, 1, 0, 1).unwrap(), vec![-2.5, -35.0]);
    }

    #[test]
    fn test_errors_name_the_line() {
        let source = InMemory::new("bad", "1 2\n3\n");
        let err = read_samples(&source, 1, 0, 1).unwrap_err();
        assert!(err.to_string().contains("bad:2"));

        let source = InMemory::new("nan", "1\nabc\n");
        let err = read_samples(&source, 0, 0, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("'abc'"));
    }
}

//! Explicit logging context
//!
//! Nothing in this workspace installs a global subscriber. Callers build a
//! [`LogContext`], turn it into a [`tracing::Dispatch`] and run work inside
//! [`LogContext::in_scope`] (or `tracing::dispatcher::with_default` on worker
//! threads). Components only ever use the `tracing` macros.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Verbosity levels of the reweighting tools
///
/// 0 quiet, 1 always, 2 error, 3 warning, 4 info, 5 debug, 6 and 7 trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Verbosity(pub u8);

impl Verbosity {
    pub const QUIET: Self = Self(0);
    pub const INFO: Self = Self(4);

    /// Map onto the tracing level filter
    pub fn level_filter(self) -> LevelFilter {
        match self.0 {
            0 => LevelFilter::OFF,
            1 | 2 => LevelFilter::ERROR,
            3 => LevelFilter::WARN,
            4 => LevelFilter::INFO,
            5 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::INFO
    }
}

/// Where and how much to log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogContext {
    pub verbosity: Verbosity,
    /// Suppress stderr output. A logfile still receives events.
    pub quiet: bool,
    pub logfile: Option<PathBuf>,
}

impl LogContext {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Default::default()
        }
    }

    /// A context that drops every event
    pub fn silent() -> Self {
        Self::new(Verbosity::QUIET)
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_logfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.logfile = Some(path.into());
        self
    }

    /// Effective level after accounting for the available sinks
    pub fn effective_level(&self) -> LevelFilter {
        if self.quiet && self.logfile.is_none() {
            LevelFilter::OFF
        } else {
            self.verbosity.level_filter()
        }
    }

    /// Build the dispatcher for this context
    ///
    /// The logfile is opened in append mode; failing to open it is an
    /// [`Error::Unwritable`].
    pub fn dispatch(&self) -> Result<Dispatch> {
        let level = self.effective_level();
        let builder = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_ansi(false);

        let file = match &self.logfile {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| Error::Unwritable {
                        path: path.clone(),
                        source,
                    })?,
            ),
            None => None,
        };

        let dispatch = match (file, self.quiet) {
            (None, _) => Dispatch::new(builder.with_writer(std::io::stderr).finish()),
            (Some(file), true) => Dispatch::new(builder.with_writer(Mutex::new(file)).finish()),
            (Some(file), false) => Dispatch::new(
                builder
                    .with_writer(std::io::stderr.and(Mutex::new(file)))
                    .finish(),
            ),
        };
        Ok(dispatch)
    }

    /// Run `f` with this context's dispatcher as the thread default
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        let dispatch = self.dispatch()?;
        Ok(tracing::dispatcher::with_default(&dispatch, f))
    }
}

/// The dispatcher active on this thread
///
/// Capture it before fanning out and re-enter it on each worker with
/// `tracing::dispatcher::with_default`, since worker threads do not inherit
/// thread-local defaults.
pub fn current_dispatch() -> Dispatch {
    tracing::dispatcher::get_default(|d| d.clone())
}

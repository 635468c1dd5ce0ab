//! Sweep error definitions.
//!
//! Every failure the driver can surface is a variant of [`SweepError`]. The
//! variants fall into four groups:
//! 1. **Configuration:** `InvalidFormat`, `InvalidSize` and `Config`, raised before any
//!    simulator process is spawned.
//! 2. **Registry:** `InvalidArchitecture` and `InvalidBenchmark`.
//! 3. **Report parsing:** `EmptyReport`, `StatisticNotFound`, `MalformedStatistic`
//!    and `DivisionByZero`.
//! 4. **Process:** `SubprocessFailure`, `Interrupted` and `Io`.
//!
//! None of them are retried; the driver stops at the first one unless the
//! continue-on-error policy is selected.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used by every fallible function in the crate.
pub type SweepResult<T> = Result<T, SweepError>;

/// Terminal error for a grid cell or for the whole sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    /// A configuration value does not match its grammar.
    ///
    /// For byte sizes the grammar is `^\d+(k|M)?B$`; unitless values must be
    /// unsigned integers.
    #[error("invalid {name} '{value}'")]
    InvalidFormat {
        /// Display name of the variable (e.g. `ICache Size`).
        name: String,
        /// The rejected value as written by the user.
        value: String,
    },

    /// A byte size parsed correctly but is zero or not a power of two.
    #[error("{name} '{value}' is not a power of 2")]
    InvalidSize {
        /// Display name of the variable.
        name: String,
        /// The rejected value as written by the user.
        value: String,
    },

    /// The architecture tag is not one the simulator was built for.
    #[error("invalid architecture '{0}'")]
    InvalidArchitecture(String),

    /// The benchmark name is not in the registry.
    #[error("invalid benchmark '{0}'")]
    InvalidBenchmark(String),

    /// The report file exists but holds no lines.
    #[error("empty report {}, try using the --verbose flag to check simulation output", path.display())]
    EmptyReport {
        /// Path of the report that was read.
        path: PathBuf,
    },

    /// The report ended before the line(s) for a statistic were found.
    #[error("could not find {what} in {}", path.display())]
    StatisticNotFound {
        /// Human-readable description of the missing line.
        what: &'static str,
        /// Path of the report that was read.
        path: PathBuf,
    },

    /// A matching report line had no value token, or the token is not numeric.
    #[error("malformed value for '{key}' in {}: {line:?}", path.display())]
    MalformedStatistic {
        /// Key prefix that matched the line.
        key: &'static str,
        /// The offending line, trimmed.
        line: String,
        /// Path of the report that was read.
        path: PathBuf,
    },

    /// The report's instruction count is zero, so CPI is undefined.
    #[error("instruction count is zero in {}", path.display())]
    DivisionByZero {
        /// Path of the report that was read.
        path: PathBuf,
    },

    /// The simulator could not be started or exited unsuccessfully.
    #[error("simulator command `{command}` failed: {reason}")]
    SubprocessFailure {
        /// The rendered command line.
        command: String,
        /// Spawn error or exit status.
        reason: String,
    },

    /// The sweep was cancelled while a simulation was running.
    #[error("interrupted while waiting for the simulator")]
    Interrupted,

    /// A sweep plan could not be parsed or is structurally invalid.
    #[error("invalid sweep plan: {0}")]
    Config(String),

    /// File access failed for a report, table or plan.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl SweepError {
    /// Builds an [`SweepError::Io`] for `path`; intended for `map_err`.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// True for errors raised while validating a cell, before any process runs.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. }
                | Self::InvalidSize { .. }
                | Self::InvalidArchitecture(_)
                | Self::InvalidBenchmark(_)
        )
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

//! Simulation statistics extraction.
//!
//! gem5 writes a `stats.txt` report after every run, one statistic per line in
//! the form `<dotted.key> <value> [# comment]`. This module reads the handful
//! of keys the sweep cares about:
//! 1. **CPI:** `system.cpu.numCycles` divided by `simInsts`. The instruction
//!    count line precedes the cycle count line in the report.
//! 2. **Overall dcache miss rate:** `system.cpu.dcache.overallMissRate::cpu.data`.
//!
//! Reading is pure: the same report always yields the same value.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::common::error::{SweepError, SweepResult};

/// Report key holding the committed instruction count.
pub const SIM_INSTS_KEY: &str = "simInsts";

/// Report key holding the CPU cycle count.
pub const NUM_CYCLES_KEY: &str = "system.cpu.numCycles";

/// Report key holding the data cache miss rate over all accesses.
pub const DCACHE_MISS_RATE_KEY: &str = "system.cpu.dcache.overallMissRate::cpu.data";

/// A statistic that can be extracted from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Cycles per instruction.
    Cpi,
    /// Overall L1 data cache miss rate.
    #[serde(alias = "miss_rate")]
    OverallDcacheMissRate,
}

impl Statistic {
    /// Column label used in result tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cpi => "Cycles Per Instruction",
            Self::OverallDcacheMissRate => "Overall DCache Miss Rate",
        }
    }

    /// Reads the statistic from the report at `path`.
    pub fn extract(self, path: &Path) -> SweepResult<f64> {
        debug!(statistic = %self, report = %path.display(), "reading report");
        let file = File::open(path).map_err(SweepError::io(path))?;
        self.extract_from(BufReader::new(file), path)
    }

    /// Reads the statistic from an already opened report.
    ///
    /// `path` is only used to label errors.
    pub fn extract_from(self, reader: impl BufRead, path: &Path) -> SweepResult<f64> {
        let mut scanner = ReportScanner::new(reader, path);
        match self {
            Self::Cpi => cpi(&mut scanner),
            Self::OverallDcacheMissRate => {
                while let Some(line) = scanner.next_line()? {
                    if let Some(value) = scanner.value_for::<f64>(&line, DCACHE_MISS_RATE_KEY)? {
                        return Ok(value);
                    }
                }
                Err(scanner.not_found("overall dcache miss rate"))
            }
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computes cycles per instruction.
///
/// Cycle lines seen before the instruction count are ignored, since the ratio
/// needs both and gem5 always emits `simInsts` first.
fn cpi<R: BufRead>(scanner: &mut ReportScanner<'_, R>) -> SweepResult<f64> {
    let mut instructions: Option<u64> = None;
    while let Some(line) = scanner.next_line()? {
        if let Some(count) = scanner.value_for::<u64>(&line, SIM_INSTS_KEY)? {
            instructions = Some(count);
        } else if let Some(insts) = instructions {
            if let Some(cycles) = scanner.value_for::<u64>(&line, NUM_CYCLES_KEY)? {
                if insts == 0 {
                    return Err(SweepError::DivisionByZero {
                        path: scanner.path.to_path_buf(),
                    });
                }
                return Ok(cycles as f64 / insts as f64);
            }
        }
    }
    Err(scanner.not_found(if instructions.is_some() {
        "cycle count"
    } else {
        "instruction count"
    }))
}

/// Line-by-line reader that tracks whether the report held any line at all.
struct ReportScanner<'a, R> {
    reader: R,
    path: &'a Path,
    lines_read: usize,
}

impl<'a, R: BufRead> ReportScanner<'a, R> {
    const fn new(reader: R, path: &'a Path) -> Self {
        Self {
            reader,
            path,
            lines_read: 0,
        }
    }

    /// Returns the next line, or fails with `EmptyReport` if the first read hits EOF.
    fn next_line(&mut self) -> SweepResult<Option<String>> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(SweepError::io(self.path))?;
        if n == 0 {
            if self.lines_read == 0 {
                return Err(SweepError::EmptyReport {
                    path: self.path.to_path_buf(),
                });
            }
            return Ok(None);
        }
        self.lines_read += 1;
        Ok(Some(line))
    }

    /// Parses the value token of `line` if its first token starts with `key`.
    fn value_for<T: FromStr>(&self, line: &str, key: &'static str) -> SweepResult<Option<T>> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(first) if first.starts_with(key) => {}
            _ => return Ok(None),
        }
        tokens
            .next()
            .and_then(|token| token.parse::<T>().ok())
            .map(Some)
            .ok_or_else(|| SweepError::MalformedStatistic {
                key,
                line: line.trim().to_string(),
                path: self.path.to_path_buf(),
            })
    }

    fn not_found(&self, what: &'static str) -> SweepError {
        SweepError::StatisticNotFound {
            what,
            path: self.path.to_path_buf(),
        }
    }
}

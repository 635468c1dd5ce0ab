//! Comma-separated result tables.
//!
//! Each variable set writes to its own table. Rows are appended one at a time
//! and flushed immediately, so an interrupted sweep keeps every completed row.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::error::{SweepError, SweepResult};
use crate::config::VariableSet;
use crate::sim::registry::{Architecture, Benchmark};

use super::variables::ConfigVariable;

/// One written line of a result table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Architecture the cell ran on.
    pub architecture: Architecture,
    /// Benchmark the cell ran.
    pub benchmark: Benchmark,
    /// Integer value of every axis, in axis order.
    pub values: Vec<u64>,
    /// Index of the argument string, present only in per-argument mode.
    pub argument: Option<usize>,
    /// Extracted statistic.
    pub statistic: f64,
}

impl ResultRow {
    /// Builds a row from a cell's resolved variables.
    pub fn new(
        architecture: Architecture,
        benchmark: Benchmark,
        variables: &[ConfigVariable],
        argument: Option<usize>,
        statistic: f64,
    ) -> Self {
        Self {
            architecture,
            benchmark,
            values: variables.iter().map(|v| v.resolved).collect(),
            argument,
            statistic,
        }
    }

    /// CSV line without the trailing newline.
    ///
    /// The statistic always carries a decimal point (`4.0`, not `4`).
    pub fn to_csv(&self) -> String {
        let mut fields = vec![self.architecture.to_string(), self.benchmark.to_string()];
        fields.extend(self.values.iter().map(u64::to_string));
        if let Some(index) = self.argument {
            fields.push(index.to_string());
        }
        fields.push(format!("{:?}", self.statistic));
        fields.join(",")
    }
}

/// Header line for `part`; `per_argument` adds the `Argument` column.
pub fn header(part: &VariableSet, per_argument: bool) -> String {
    let mut columns = vec!["Architecture".to_string(), "Benchmark".to_string()];
    columns.extend(part.axes.iter().map(|axis| axis.column()));
    if per_argument {
        columns.push("Argument".to_string());
    }
    columns.push(part.statistic.label().to_string());
    columns.join(",")
}

/// An open output table.
#[derive(Debug)]
pub struct ResultTable {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
}

impl ResultTable {
    /// Opens the table at `path`, creating parent directories as needed.
    ///
    /// The file is truncated and `header` written, unless `append` is set, in
    /// which case rows are added after the existing content and no header is
    /// written.
    pub fn open(path: &Path, header: &str, append: bool) -> SweepResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SweepError::io(parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(SweepError::io(path))?;
        let mut table = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            rows: 0,
        };
        if !append {
            table.write_line(header)?;
        }
        Ok(table)
    }

    /// Appends and flushes one row.
    pub fn append(&mut self, row: &ResultRow) -> SweepResult<()> {
        self.write_line(&row.to_csv())?;
        self.rows += 1;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> SweepResult<()> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .map_err(SweepError::io(&self.path))
    }

    /// Rows written through this handle.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// File backing this table.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

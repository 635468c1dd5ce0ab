//! Sweep driver.
//!
//! Iterates the full grid in a fixed nesting order:
//! architecture → benchmark → variable set → first axis → … → last axis.
//! For every cell it resolves the configuration, runs the simulator once per
//! benchmark argument string, extracts the variable set's statistic and
//! appends a row to that set's table.
//!
//! Cells are independent of one another; the only state carried between them
//! is the open tables and the elapsed-time total. Execution is sequential
//! because the simulator always writes its report to the same path.

/// Cartesian product of axis values.
pub mod grid;
/// CSV output tables.
pub mod table;
/// Per-cell resolved variables.
pub mod variables;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::common::error::{SweepError, SweepResult};
use crate::common::time::format_duration;
use crate::config::{FailurePolicy, RecordMode, SweepConfig, VariableSet};
use crate::sim::invoker::{Invocation, SimulationRunner};
use crate::sim::registry::{Architecture, BenchmarkDescriptor};

pub use grid::Grid;
pub use table::{ResultRow, ResultTable};
pub use variables::ConfigVariable;

/// Outcome of a completed sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Rows appended across all tables.
    pub rows: usize,
    /// Cells skipped under [`FailurePolicy::Continue`].
    pub failed_cells: usize,
    /// Wall-clock time of the whole sweep.
    pub elapsed: Duration,
    /// Tables written, in part order.
    pub tables: Vec<PathBuf>,
}

/// Drives a runner across every cell of a plan.
#[derive(Debug)]
pub struct SweepDriver<R> {
    config: SweepConfig,
    runner: R,
}

impl<R: SimulationRunner> SweepDriver<R> {
    /// Creates a driver for `config` using `runner` for every simulation.
    pub const fn new(config: SweepConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// The plan being swept.
    pub const fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// The runner, e.g. to inspect a mock after a sweep.
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the whole sweep.
    ///
    /// Tables are opened before the first cell. Under the default
    /// [`FailurePolicy::Abort`] the first error ends the sweep; rows written
    /// before it stay on disk. An interrupt always ends the sweep.
    pub fn run(&mut self) -> SweepResult<SweepSummary> {
        let config = &self.config;
        config.validate()?;

        let per_argument = config.record == RecordMode::PerArgument;
        let mut tables = config
            .parts
            .iter()
            .map(|part| {
                ResultTable::open(
                    &config.table_path(part),
                    &table::header(part, per_argument),
                    config.append,
                )
            })
            .collect::<SweepResult<Vec<_>>>()?;

        info!(
            cells = config.cell_count(),
            output = %config.output_directory.display(),
            "starting sweep"
        );
        let started = Instant::now();
        let mut failed_cells = 0;

        for &architecture in &config.architectures {
            for &benchmark in &config.benchmarks {
                let descriptor =
                    benchmark.describe(&config.benchmarks_dir, architecture, config.benchmark_size);
                for (part, table) in config.parts.iter().zip(tables.iter_mut()) {
                    let axes = part.axes.iter().map(|axis| axis.values.as_slice()).collect();
                    for values in Grid::new(axes) {
                        let cell = Cell {
                            architecture,
                            descriptor: &descriptor,
                            part,
                            values: &values,
                        };
                        match run_cell(&mut self.runner, &cell, config.record, table) {
                            Ok(()) => {}
                            Err(err @ SweepError::Interrupted) => return Err(err),
                            Err(err) if config.on_error == FailurePolicy::Continue => {
                                warn!(
                                    cell = %cell.describe(),
                                    error = %err,
                                    simulated = !err.is_validation(),
                                    "cell failed, continuing"
                                );
                                failed_cells += 1;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        info!(elapsed = %format_duration(elapsed), "sweep complete");
        Ok(SweepSummary {
            rows: tables.iter().map(ResultTable::rows).sum(),
            failed_cells,
            elapsed,
            tables: tables.iter().map(|t| t.path().to_path_buf()).collect(),
        })
    }
}

/// One grid cell.
struct Cell<'a> {
    architecture: Architecture,
    descriptor: &'a BenchmarkDescriptor,
    part: &'a VariableSet,
    values: &'a [&'a str],
}

impl Cell<'_> {
    /// `X86 crc ICache Size=2kB DCache Size=4kB`, for logs.
    fn describe(&self) -> String {
        let assignments: Vec<String> = self
            .part
            .axes
            .iter()
            .zip(self.values)
            .map(|(axis, value)| format!("{}={value}", axis.name))
            .collect();
        format!(
            "{} {} {}",
            self.architecture,
            self.descriptor.benchmark,
            assignments.join(" ")
        )
    }
}

/// Validates, simulates and records one cell.
///
/// Validation happens before any process is spawned. Rows are only written
/// once every run of the cell has succeeded.
fn run_cell<R: SimulationRunner>(
    runner: &mut R,
    cell: &Cell<'_>,
    record: RecordMode,
    table: &mut ResultTable,
) -> SweepResult<()> {
    let variables = variables::resolve_all(&cell.part.axes, cell.values)?;
    let described = cell.describe();
    info!(cell = %described, "simulating");
    let started = Instant::now();

    let mut rows = Vec::with_capacity(cell.descriptor.arguments.len());
    for (index, argument) in cell.descriptor.arguments.iter().enumerate() {
        runner.run(&Invocation {
            architecture: cell.architecture,
            benchmark: cell.descriptor,
            argument,
            variables: &variables,
        })?;
        if record == RecordMode::PerArgument {
            let statistic = cell.part.statistic.extract(&runner.report_path())?;
            rows.push(ResultRow::new(
                cell.architecture,
                cell.descriptor.benchmark,
                &variables,
                Some(index),
                statistic,
            ));
        }
    }
    if record == RecordMode::LastArgument {
        let statistic = cell.part.statistic.extract(&runner.report_path())?;
        rows.push(ResultRow::new(
            cell.architecture,
            cell.descriptor.benchmark,
            &variables,
            None,
            statistic,
        ));
    }

    for row in &rows {
        table.append(row)?;
    }
    info!(cell = %described, elapsed = %format_duration(started.elapsed()), "done");
    Ok(())
}

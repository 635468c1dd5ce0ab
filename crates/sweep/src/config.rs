//! Sweep plan configuration.
//!
//! This module defines everything needed to describe a sweep without touching
//! the simulator. It provides:
//! 1. **Defaults:** Simulator paths, value grids and policies.
//! 2. **Structures:** `SweepConfig` (the plan), `SimulatorConfig` (gem5 layout) and
//!    `VariableSet`/`VariableAxis` (the swept cache parameters).
//! 3. **Enums:** Unit kinds, record mode and failure policy.
//!
//! A plan is built by the CLI from its flags, or loaded from JSON with
//! [`SweepConfig::from_path`]. Every field is optional in JSON.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::common::error::{SweepError, SweepResult};
use crate::sim::registry::{Architecture, Benchmark, BenchmarkSize};
use crate::stats::Statistic;

/// Default values for every plan field.
///
/// Used whenever neither a flag nor a plan entry overrides a field.
pub mod defaults {
    /// gem5 checkout, relative to the working directory.
    pub const SIMULATOR_ROOT: &str = "gem5";

    /// System-call emulation config script, relative to the gem5 root.
    pub const CONFIG_SCRIPT: &str = "configs/example/se.py";

    /// Simulator output directory, relative to the gem5 root.
    pub const OUTDIR: &str = "m5out";

    /// Name of the statistics report inside the output directory.
    pub const REPORT_FILE: &str = "stats.txt";

    /// gem5 build variant; the binary is `build/<ARCH>/gem5.<variant>`.
    pub const BUILD_VARIANT: &str = "opt";

    /// CPU model passed with `--cpu-type`.
    pub const CPU_TYPE: &str = "TimingSimpleCPU";

    /// Benchmark builds and inputs.
    pub const BENCHMARKS_DIR: &str = "benchmarks";

    /// Directory receiving the `part_<id>.csv` tables.
    pub const OUTPUT_DIRECTORY: &str = "out/results";

    /// Instruction cache sizes: 2kB to 32kB.
    pub fn icache_sizes() -> Vec<String> {
        (1..6).map(|i| format!("{}kB", 1u32 << i)).collect()
    }

    /// Data cache sizes: 2kB to 64kB.
    pub fn dcache_sizes() -> Vec<String> {
        (1..7).map(|i| format!("{}kB", 1u32 << i)).collect()
    }

    /// Data cache associativities: 1 to 16 ways.
    pub fn dcache_associativity() -> Vec<String> {
        (0..5).map(|i| (1u32 << i).to_string()).collect()
    }

    /// Cacheline sizes: 16 to 128 bytes.
    pub fn cacheline_sizes() -> Vec<String> {
        (4..8).map(|i| (1u32 << i).to_string()).collect()
    }
}

/// How a swept value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// A plain unsigned integer (ways, line size in bytes).
    #[default]
    Unitless,
    /// A size string such as `4kB`; must resolve to a power of two.
    #[serde(alias = "B")]
    Bytes,
}

/// Which rows a benchmark with several argument strings produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// One row per grid cell holding the statistic of the last run only.
    ///
    /// Earlier runs still execute, but their reports are overwritten before
    /// being read.
    #[default]
    LastArgument,
    /// One row per argument string, read right after each run.
    PerArgument,
}

/// What the driver does when a grid cell fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the whole sweep at the first failing cell.
    #[default]
    Abort,
    /// Log the failure, write no row for the cell, and carry on.
    ///
    /// Interrupts always abort.
    Continue,
}

/// Root sweep plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Location and fixed options of the simulator.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Directory holding the benchmark builds and inputs.
    #[serde(default = "SweepConfig::default_benchmarks_dir")]
    pub benchmarks_dir: PathBuf,

    /// Input data set size.
    #[serde(default)]
    pub benchmark_size: BenchmarkSize,

    /// Outermost loop of the sweep.
    #[serde(default = "SweepConfig::default_architectures")]
    pub architectures: Vec<Architecture>,

    /// Second loop of the sweep.
    #[serde(default = "SweepConfig::default_benchmarks")]
    pub benchmarks: Vec<Benchmark>,

    /// Variable sets, each with its own output table.
    #[serde(default = "SweepConfig::default_parts")]
    pub parts: Vec<VariableSet>,

    /// Directory receiving one CSV per part.
    #[serde(default = "SweepConfig::default_output_directory")]
    pub output_directory: PathBuf,

    /// Append to existing tables instead of truncating them (no header is written).
    #[serde(default)]
    pub append: bool,

    /// Let the simulator's own output through to the terminal.
    #[serde(default)]
    pub verbose: bool,

    /// Row policy for multi-argument benchmarks.
    #[serde(default)]
    pub record: RecordMode,

    /// Failure policy.
    #[serde(default)]
    pub on_error: FailurePolicy,
}

impl SweepConfig {
    fn default_benchmarks_dir() -> PathBuf {
        PathBuf::from(defaults::BENCHMARKS_DIR)
    }

    fn default_architectures() -> Vec<Architecture> {
        Architecture::ALL.to_vec()
    }

    fn default_benchmarks() -> Vec<Benchmark> {
        vec![Benchmark::Crc, Benchmark::Susan]
    }

    fn default_parts() -> Vec<VariableSet> {
        vec![VariableSet::cache_sizes_default(), VariableSet::associativity_default()]
    }

    fn default_output_directory() -> PathBuf {
        PathBuf::from(defaults::OUTPUT_DIRECTORY)
    }

    /// Parses and validates a JSON plan.
    pub fn from_json_str(json: &str) -> SweepResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON plan file.
    pub fn from_path(path: &Path) -> SweepResult<Self> {
        let json = fs::read_to_string(path).map_err(SweepError::io(path))?;
        Self::from_json_str(&json)
    }

    /// Checks the plan's shape.
    ///
    /// Values themselves are not checked here; each cell validates its own
    /// values right before it runs.
    pub fn validate(&self) -> SweepResult<()> {
        if self.architectures.is_empty() {
            return Err(SweepError::Config("no architectures selected".into()));
        }
        if self.benchmarks.is_empty() {
            return Err(SweepError::Config("no benchmarks selected".into()));
        }
        if self.parts.is_empty() {
            return Err(SweepError::Config("no parts selected".into()));
        }
        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.id.as_str()) {
                return Err(SweepError::Config(format!("duplicate part '{}'", part.id)));
            }
            if part.axes.is_empty() {
                return Err(SweepError::Config(format!("part '{}' has no variables", part.id)));
            }
            if let Some(axis) = part.axes.iter().find(|axis| axis.values.is_empty()) {
                return Err(SweepError::Config(format!(
                    "variable '{}' of part '{}' has no values",
                    axis.name, part.id
                )));
            }
        }
        Ok(())
    }

    /// Path of the output table for `part`.
    pub fn table_path(&self, part: &VariableSet) -> PathBuf {
        self.output_directory.join(format!("part_{}.csv", part.id))
    }

    /// Number of grid cells the plan expands to.
    pub fn cell_count(&self) -> usize {
        let per_benchmark: usize = self.parts.iter().map(VariableSet::cell_count).sum();
        self.architectures.len() * self.benchmarks.len() * per_benchmark
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            benchmarks_dir: Self::default_benchmarks_dir(),
            benchmark_size: BenchmarkSize::default(),
            architectures: Self::default_architectures(),
            benchmarks: Self::default_benchmarks(),
            parts: Self::default_parts(),
            output_directory: Self::default_output_directory(),
            append: false,
            verbose: false,
            record: RecordMode::default(),
            on_error: FailurePolicy::default(),
        }
    }
}

/// Layout of the gem5 checkout and the options passed on every run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// gem5 checkout; the other paths are resolved against it.
    #[serde(default = "SimulatorConfig::default_root")]
    pub root: PathBuf,

    /// Config script passed as the first positional argument.
    #[serde(default = "SimulatorConfig::default_config_script")]
    pub config_script: PathBuf,

    /// Output directory passed with `--outdir`.
    #[serde(default = "SimulatorConfig::default_outdir")]
    pub outdir: PathBuf,

    /// Report file name inside `outdir`.
    #[serde(default = "SimulatorConfig::default_report_file")]
    pub report_file: String,

    /// Build variant suffix of the simulator binary.
    #[serde(default = "SimulatorConfig::default_build_variant")]
    pub build_variant: String,

    /// CPU model passed with `--cpu-type`.
    #[serde(default = "SimulatorConfig::default_cpu_type")]
    pub cpu_type: String,
}

impl SimulatorConfig {
    fn default_root() -> PathBuf {
        PathBuf::from(defaults::SIMULATOR_ROOT)
    }

    fn default_config_script() -> PathBuf {
        PathBuf::from(defaults::CONFIG_SCRIPT)
    }

    fn default_outdir() -> PathBuf {
        PathBuf::from(defaults::OUTDIR)
    }

    fn default_report_file() -> String {
        defaults::REPORT_FILE.to_string()
    }

    fn default_build_variant() -> String {
        defaults::BUILD_VARIANT.to_string()
    }

    fn default_cpu_type() -> String {
        defaults::CPU_TYPE.to_string()
    }

    /// Simulator binary for `architecture`, e.g. `gem5/build/X86/gem5.opt`.
    pub fn binary(&self, architecture: Architecture) -> PathBuf {
        self.root
            .join("build")
            .join(architecture.tag())
            .join(format!("gem5.{}", self.build_variant))
    }

    /// Resolved `--outdir` path.
    pub fn outdir_path(&self) -> PathBuf {
        self.root.join(&self.outdir)
    }

    /// Resolved config script path.
    pub fn config_script_path(&self) -> PathBuf {
        self.root.join(&self.config_script)
    }

    /// Where the simulator leaves its statistics report.
    pub fn report_path(&self) -> PathBuf {
        self.outdir_path().join(&self.report_file)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            config_script: Self::default_config_script(),
            outdir: Self::default_outdir(),
            report_file: Self::default_report_file(),
            build_variant: Self::default_build_variant(),
            cpu_type: Self::default_cpu_type(),
        }
    }
}

/// One swept simulator parameter and the values it takes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableAxis {
    /// Column and log name, e.g. `ICache Size`.
    pub name: String,
    /// Simulator flag without dashes, e.g. `l1i_size`.
    pub flag: String,
    /// How values are validated and written to the table.
    #[serde(default)]
    pub unit: UnitKind,
    /// Values in sweep order, as passed to the simulator.
    #[serde(deserialize_with = "string_or_number_list")]
    pub values: Vec<String>,
}

impl VariableAxis {
    /// Creates an axis.
    pub fn new(name: &str, flag: &str, unit: UnitKind, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            flag: flag.to_string(),
            unit,
            values,
        }
    }

    /// Table header for this axis; byte axes are suffixed with `(B)`.
    pub fn column(&self) -> String {
        match self.unit {
            UnitKind::Bytes => format!("{}(B)", self.name),
            UnitKind::Unitless => self.name.clone(),
        }
    }
}

/// A group of axes swept together into one output table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSet {
    /// Short identifier; the table is written to `part_<id>.csv`.
    pub id: String,
    /// Axes in nesting order; the last one varies fastest.
    pub axes: Vec<VariableAxis>,
    /// Statistic recorded for every cell.
    pub statistic: Statistic,
}

impl VariableSet {
    /// Part `a`: instruction and data cache sizes, recording CPI.
    pub fn cache_sizes(icache_sizes: Vec<String>, dcache_sizes: Vec<String>) -> Self {
        Self {
            id: "a".to_string(),
            axes: vec![
                VariableAxis::new("ICache Size", "l1i_size", UnitKind::Bytes, icache_sizes),
                VariableAxis::new("DCache Size", "l1d_size", UnitKind::Bytes, dcache_sizes),
            ],
            statistic: Statistic::Cpi,
        }
    }

    /// Part `b`: data cache associativity and cacheline size, recording the dcache miss rate.
    pub fn associativity(associativity: Vec<String>, cacheline_sizes: Vec<String>) -> Self {
        Self {
            id: "b".to_string(),
            axes: vec![
                VariableAxis::new(
                    "DCache Associativity",
                    "l1d_assoc",
                    UnitKind::Unitless,
                    associativity,
                ),
                VariableAxis::new("Cacheline Size", "cacheline_size", UnitKind::Unitless, cacheline_sizes),
            ],
            statistic: Statistic::OverallDcacheMissRate,
        }
    }

    /// Part `a` with the default size grids.
    pub fn cache_sizes_default() -> Self {
        Self::cache_sizes(defaults::icache_sizes(), defaults::dcache_sizes())
    }

    /// Part `b` with the default grids.
    pub fn associativity_default() -> Self {
        Self::associativity(defaults::dcache_associativity(), defaults::cacheline_sizes())
    }

    /// Number of value combinations in this set.
    pub fn cell_count(&self) -> usize {
        self.axes.iter().map(|axis| axis.values.len()).product()
    }
}

/// Accepts `["4kB", 8, "16"]`-style lists, keeping every entry as text.
fn string_or_number_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    let raw = Vec::<Raw>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| match value {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        })
        .collect())
}

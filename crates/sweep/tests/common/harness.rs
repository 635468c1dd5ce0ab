use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

use cachesweep_core::config::{SimulatorConfig, SweepConfig, VariableSet};
use cachesweep_core::sim::{Architecture, Benchmark};

/// Serialises tests that write and then execute scripts.
///
/// Spawning while another thread still holds a freshly written script open
/// for writing fails with `ETXTBSY`.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A gem5-style report with the three keys the sweep reads.
pub fn stats_report(instructions: u64, cycles: u64, miss_rate: f64) -> String {
    format!(
        "\n---------- Begin Simulation Statistics ----------\n\
simSeconds                                   0.000123                       # Number of seconds simulated (Second)\n\
simInsts                                     {instructions}                       # Number of instructions simulated (Count)\n\
system.cpu.numCycles                         {cycles}                       # Number of cpu cycles simulated (Cycle)\n\
system.cpu.dcache.overallMissRate::cpu.data  {miss_rate}                       # miss rate for overall accesses (Ratio)\n\
system.cpu.dcache.overallMissRate::total     {miss_rate}                       # miss rate for overall accesses (Ratio)\n\
\n---------- End Simulation Statistics   ----------\n"
    )
}

pub fn write_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Temporary directory laid out like a gem5 checkout plus an output directory.
#[derive(Debug)]
pub struct Workspace {
    pub dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        init_logging();
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig {
            root: self.path().join("gem5"),
            ..SimulatorConfig::default()
        }
    }

    pub fn output_directory(&self) -> PathBuf {
        self.path().join("results")
    }

    /// A plan over one architecture and one benchmark.
    pub fn config(&self, architecture: Architecture, benchmark: Benchmark, parts: Vec<VariableSet>) -> SweepConfig {
        SweepConfig {
            simulator: self.simulator(),
            benchmarks_dir: self.path().join("benchmarks"),
            architectures: vec![architecture],
            benchmarks: vec![benchmark],
            parts,
            output_directory: self.output_directory(),
            ..SweepConfig::default()
        }
    }

    pub fn read_table(&self, id: &str) -> String {
        fs::read_to_string(self.output_directory().join(format!("part_{id}.csv"))).unwrap()
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

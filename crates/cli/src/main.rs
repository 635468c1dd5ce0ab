//! Cache-parameter sweep CLI.
//!
//! This binary is the entry point for running sweeps. It performs:
//! 1. **Plan building:** From a JSON plan (`--plan`) or from flags (parts,
//!    architectures, benchmarks, value grids).
//! 2. **Setup:** Logging via `tracing-subscriber` and a Ctrl-C handler that
//!    kills the running simulator and stops the sweep.
//! 3. **Run:** Hands the plan to the sweep driver with the gem5 runner.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cachesweep_core::common::format_duration;
use cachesweep_core::config::{FailurePolicy, RecordMode, VariableSet, defaults};
use cachesweep_core::sim::{Architecture, Benchmark, BenchmarkSize, CancellationToken};
use cachesweep_core::sweep::SweepSummary;
use cachesweep_core::{Gem5Runner, SweepConfig, SweepDriver, SweepError, SweepResult};

/// Exit status used when the sweep is interrupted (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(
    name = "cachesweep",
    author,
    version,
    about = "Sweep L1 cache parameters across gem5 runs",
    long_about = "Run gem5 once per combination of architecture, benchmark and cache \
configuration, and collect CPI or dcache miss rate into part_<id>.csv tables.\n\n\
Examples:\n  cachesweep\n  cachesweep -p a -a X86 -b crc --icache-sizes 1kB 2kB --dcache-sizes 1kB\n  \
cachesweep --plan sweeps/assoc.json"
)]
struct Cli {
    /// JSON sweep plan. When given, the grid flags below are ignored.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Parts to run: `a` (cache sizes → CPI), `b` (associativity/line size → miss rate).
    #[arg(short, long, num_args = 1..)]
    parts: Vec<Part>,

    /// Architectures to simulate.
    #[arg(short, long, num_args = 1..)]
    architectures: Vec<Architecture>,

    /// Benchmarks to simulate.
    #[arg(short, long, num_args = 1..)]
    benchmarks: Vec<Benchmark>,

    /// Instruction cache sizes for part a.
    #[arg(long, visible_alias = "is", num_args = 1..)]
    icache_sizes: Vec<String>,

    /// Data cache sizes for part a.
    #[arg(long, visible_alias = "ds", num_args = 1..)]
    dcache_sizes: Vec<String>,

    /// Data cache associativities for part b (1, 2, 4, 8 or 16).
    #[arg(long, visible_alias = "da", num_args = 1.., value_parser = parse_associativity)]
    dcache_associativity: Vec<u32>,

    /// Cacheline sizes for part b (16, 32, 64 or 128).
    #[arg(long, visible_alias = "cs", num_args = 1.., value_parser = parse_cacheline_size)]
    cacheline_sizes: Vec<u32>,

    /// Input data set of the benchmarks.
    #[arg(long, value_enum, default_value_t = SizeArg::Small)]
    benchmark_size: SizeArg,

    /// Directory receiving the result tables.
    #[arg(short, long, default_value = defaults::OUTPUT_DIRECTORY)]
    output_directory: PathBuf,

    /// gem5 checkout holding `build/<ARCH>/gem5.opt`.
    #[arg(long, default_value = defaults::SIMULATOR_ROOT)]
    gem5_root: PathBuf,

    /// Append to existing tables instead of overwriting them.
    #[arg(long)]
    append: bool,

    /// Show simulator output and debug logs.
    #[arg(short, long)]
    verbose: bool,

    /// Run the dummy benchmark instead of the selected ones.
    #[arg(short, long)]
    test: bool,

    /// Write one row per benchmark argument string instead of one per cell.
    #[arg(long)]
    per_argument_rows: bool,

    /// Log failing cells and continue instead of stopping the sweep.
    #[arg(long)]
    keep_going: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Part {
    #[value(alias = "1")]
    A,
    #[value(alias = "2")]
    B,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SizeArg {
    Small,
    Large,
}

impl From<SizeArg> for BenchmarkSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => Self::Small,
            SizeArg::Large => Self::Large,
        }
    }
}

const ASSOCIATIVITY_CHOICES: [u32; 5] = [1, 2, 4, 8, 16];
const CACHELINE_CHOICES: [u32; 4] = [16, 32, 64, 128];

fn one_of(value: &str, choices: &[u32]) -> Result<u32, String> {
    let number: u32 = value.parse().map_err(|e| format!("{e}"))?;
    if choices.contains(&number) {
        Ok(number)
    } else {
        Err(format!("expected one of {choices:?}"))
    }
}

fn parse_associativity(value: &str) -> Result<u32, String> {
    one_of(value, &ASSOCIATIVITY_CHOICES)
}

fn parse_cacheline_size(value: &str) -> Result<u32, String> {
    one_of(value, &CACHELINE_CHOICES)
}

/// Returns `values`, or `default()` when the flag was not given.
fn or_default<T>(values: Vec<T>, default: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if values.is_empty() { default() } else { values }
}

fn to_strings(values: &[u32]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl Cli {
    /// Builds the sweep plan from the plan file or the flags.
    fn into_config(self) -> SweepResult<SweepConfig> {
        let mut config = match &self.plan {
            Some(path) => SweepConfig::from_path(path)?,
            None => self.grid_config(),
        };
        if self.test {
            config.benchmarks = vec![Benchmark::Dummy];
        }
        config.verbose |= self.verbose;
        config.append |= self.append;
        if self.per_argument_rows {
            config.record = RecordMode::PerArgument;
        }
        if self.keep_going {
            config.on_error = FailurePolicy::Continue;
        }
        config.validate()?;
        Ok(config)
    }

    fn grid_config(&self) -> SweepConfig {
        let base = SweepConfig::default();
        let mut parts: Vec<Part> = Vec::new();
        for &part in &self.parts {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }
        if parts.is_empty() {
            parts = vec![Part::A, Part::B];
        }

        let parts = parts
            .into_iter()
            .map(|part| match part {
                Part::A => VariableSet::cache_sizes(
                    or_default(self.icache_sizes.clone(), defaults::icache_sizes),
                    or_default(self.dcache_sizes.clone(), defaults::dcache_sizes),
                ),
                Part::B => VariableSet::associativity(
                    or_default(to_strings(&self.dcache_associativity), defaults::dcache_associativity),
                    or_default(to_strings(&self.cacheline_sizes), defaults::cacheline_sizes),
                ),
            })
            .collect();

        let mut config = SweepConfig {
            architectures: or_default(self.architectures.clone(), || base.architectures.clone()),
            benchmarks: or_default(self.benchmarks.clone(), || base.benchmarks.clone()),
            parts,
            benchmark_size: self.benchmark_size.into(),
            output_directory: self.output_directory.clone(),
            ..base
        };
        config.simulator.root.clone_from(&self.gem5_root);
        config
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_target(false)
        .init();
}

/// Installs a Ctrl-C handler that cancels `token`.
///
/// The running simulator is killed by the invoker once it sees the token.
fn install_interrupt_handler(token: &CancellationToken) {
    let token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("could not install Ctrl-C handler: {e}");
    }
}

fn log_plan(config: &SweepConfig) {
    let names = |items: &[String]| items.join(", ");
    info!("running with the following parameters:");
    info!(
        "  architectures: {}",
        names(&config.architectures.iter().map(ToString::to_string).collect::<Vec<_>>())
    );
    info!(
        "  benchmarks: {}",
        names(&config.benchmarks.iter().map(ToString::to_string).collect::<Vec<_>>())
    );
    for part in &config.parts {
        for axis in &part.axes {
            info!("  part {} {}: {}", part.id, axis.name, names(&axis.values));
        }
    }
    info!("  benchmark size: {}", config.benchmark_size);
    info!("  output directory: {}", config.output_directory.display());
    info!("  append: {}  verbose: {}", config.append, config.verbose);
    info!("  record: {:?}  on error: {:?}", config.record, config.on_error);
}

fn run(cli: Cli) -> SweepResult<SweepSummary> {
    let config = cli.into_config()?;
    log_plan(&config);

    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);

    let runner = Gem5Runner::new(config.simulator.clone(), config.verbose, cancel);
    SweepDriver::new(config, runner).run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(summary) => {
            info!(
                "sweep complete: {} rows in {} table(s), total time taken: {}",
                summary.rows,
                summary.tables.len(),
                format_duration(summary.elapsed)
            );
            if summary.failed_cells > 0 {
                warn!("{} cell(s) failed and were skipped", summary.failed_cells);
            }
            ExitCode::SUCCESS
        }
        Err(SweepError::Interrupted) => {
            error!("interrupted; completed rows were kept");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

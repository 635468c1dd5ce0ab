//! Simulator invocation.
//!
//! This module launches one simulator process per (architecture, benchmark
//! argument, configuration) triple and blocks until it exits. It provides:
//! 1. **Command building:** The gem5 argument vector, with one `--flag=value`
//!    token per configuration variable.
//! 2. **Waiting:** Polling the child so an external interrupt can kill it early.
//! 3. **Runner seam:** The `SimulationRunner` trait, so the sweep driver can be
//!    exercised without a real simulator.
//!
//! The simulator's statistics report is a byproduct: it is left at a fixed
//! path that the caller reads afterwards.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::common::error::{SweepError, SweepResult};
use crate::config::SimulatorConfig;
use crate::sweep::variables::ConfigVariable;

use super::registry::{Architecture, BenchmarkDescriptor};

/// How often a running child is checked for exit or cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared flag requesting that the sweep stop.
///
/// Clones observe the same flag. The CLI sets it from its interrupt handler.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything needed for one simulator run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Guest architecture; selects the simulator build.
    pub architecture: Architecture,
    /// Benchmark binary and arguments for that architecture.
    pub benchmark: &'a BenchmarkDescriptor,
    /// The argument string for this run, one of `benchmark.arguments`.
    pub argument: &'a str,
    /// Resolved configuration, one flag token each.
    pub variables: &'a [ConfigVariable],
}

/// Runs the simulator for one invocation.
///
/// Implementations block until the run finishes and leave the statistics
/// report at [`report_path`](Self::report_path).
pub trait SimulationRunner {
    /// Executes one run; no retries.
    fn run(&mut self, invocation: &Invocation<'_>) -> SweepResult<()>;

    /// Where the report of the most recent run can be read.
    fn report_path(&self) -> PathBuf;
}

/// Runs a pre-built gem5 binary as a subprocess.
#[derive(Debug, Clone)]
pub struct Gem5Runner {
    simulator: SimulatorConfig,
    verbose: bool,
    cancel: CancellationToken,
}

impl Gem5Runner {
    /// Creates a runner.
    ///
    /// # Arguments
    ///
    /// * `simulator` - gem5 layout and fixed options.
    /// * `verbose` - Inherit the child's stdout/stderr instead of discarding them.
    /// * `cancel` - Checked while waiting; when set, the child is killed.
    pub const fn new(simulator: SimulatorConfig, verbose: bool, cancel: CancellationToken) -> Self {
        Self {
            simulator,
            verbose,
            cancel,
        }
    }

    /// Arguments passed to the simulator binary, in order.
    pub fn arguments(&self, invocation: &Invocation<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            prefixed("--outdir=", &self.simulator.outdir_path()),
            self.simulator.config_script_path().into_os_string(),
            prefixed("--cmd=", &invocation.benchmark.binary),
            format!("--options={}", invocation.argument).into(),
            format!("--cpu-type={}", self.simulator.cpu_type).into(),
            "--caches".into(),
        ];
        args.extend(invocation.variables.iter().map(|v| v.flag_token().into()));
        args
    }

    /// Builds the full command for `invocation`.
    pub fn command(&self, invocation: &Invocation<'_>) -> Command {
        let mut command = Command::new(self.simulator.binary(invocation.architecture));
        let _ = command.args(self.arguments(invocation));
        let output = || {
            if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            }
        };
        let _ = command.stdout(output()).stderr(output());
        command
    }

    /// Polls `child` until it exits or the sweep is cancelled.
    ///
    /// A terminal Ctrl-C reaches the child and this process together, so a
    /// child that fails while the token is set counts as interrupted.
    fn wait(&self, mut child: Child, rendered: &str) -> SweepResult<()> {
        loop {
            let status = child.try_wait().map_err(|e| SweepError::SubprocessFailure {
                command: rendered.to_string(),
                reason: e.to_string(),
            })?;
            match status {
                Some(status) if status.success() => return Ok(()),
                Some(_) if self.cancel.is_cancelled() => return Err(SweepError::Interrupted),
                Some(status) => {
                    return Err(SweepError::SubprocessFailure {
                        command: rendered.to_string(),
                        reason: status.to_string(),
                    });
                }
                None if self.cancel.is_cancelled() => {
                    stop(&mut child);
                    return Err(SweepError::Interrupted);
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

impl SimulationRunner for Gem5Runner {
    fn run(&mut self, invocation: &Invocation<'_>) -> SweepResult<()> {
        if self.cancel.is_cancelled() {
            return Err(SweepError::Interrupted);
        }
        let mut command = self.command(invocation);
        let rendered = render(&command);
        debug!(command = %rendered, "launching simulator");
        let child = command.spawn().map_err(|e| SweepError::SubprocessFailure {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;
        self.wait(child, &rendered)
    }

    fn report_path(&self) -> PathBuf {
        self.simulator.report_path()
    }
}

/// Kills and reaps a cancelled child.
fn stop(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(pid = child.id(), error = %e, "failed to kill simulator");
    }
    if let Err(e) = child.wait() {
        debug!(pid = child.id(), error = %e, "failed to reap simulator");
    }
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path);
    arg
}

/// Space-joined command line for logs and error messages.
pub fn render(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Cache-parameter sweep library for the gem5 simulator.
//!
//! This crate drives an external, pre-built gem5 binary across a grid of cache
//! configurations and collects one statistic per grid cell. It provides:
//! 1. **Units:** Parsing and validation of size strings such as `4kB` or `128B`.
//! 2. **Statistics:** Extraction of CPI and miss-rate figures from `stats.txt` reports.
//! 3. **Simulation:** Architecture/benchmark registry and the subprocess invoker.
//! 4. **Sweep:** The Cartesian-product driver and the CSV result tables.
//! 5. **Configuration:** Serde-backed sweep plans with the default cache grids.

/// Common types shared by every stage (errors, units, timing).
pub mod common;
/// Sweep plan configuration (defaults, variable sets, policies).
pub mod config;
/// Simulator registry and subprocess invocation.
pub mod sim;
/// Statistics report parsing.
pub mod stats;
/// Grid iteration and result tables.
pub mod sweep;

/// Root configuration type; use `SweepConfig::default()` or load a JSON plan.
pub use crate::config::SweepConfig;
/// Error type returned by every fallible operation in the crate.
pub use crate::common::error::{SweepError, SweepResult};
/// Production runner that launches gem5.
pub use crate::sim::invoker::Gem5Runner;
/// Grid driver; construct with `SweepDriver::new`.
pub use crate::sweep::SweepDriver;

//! Simulator registry and invocation.
//!
//! Resolves architecture and benchmark names to concrete binaries and argument
//! strings, and runs the simulator once per argument string.

/// Subprocess launch, waiting and cancellation.
pub mod invoker;
/// Architecture and benchmark lookup.
pub mod registry;

pub use invoker::{CancellationToken, Gem5Runner, Invocation, SimulationRunner};
pub use registry::{Architecture, Benchmark, BenchmarkDescriptor, BenchmarkSize};

//! Common utilities and types used throughout the sweep driver.
//!
//! This module provides the building blocks shared by the parser, invoker and
//! driver. It includes:
//! 1. **Error Handling:** The `SweepError` taxonomy and the `SweepResult` alias.
//! 2. **Units:** Byte-size parsing and the power-of-two check.
//! 3. **Timing:** Compact human-readable formatting of elapsed time.

/// Error types for configuration, registry, report and subprocess failures.
pub mod error;

/// Elapsed-time formatting.
pub mod time;

/// Byte-size strings and their validation.
pub mod units;

pub use error::{SweepError, SweepResult};
pub use time::format_duration;
pub use units::{ensure_power_of_two, parse_size, resolve_size};

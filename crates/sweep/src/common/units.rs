//! Byte-size strings.
//!
//! Sizes are written the way gem5 accepts them on its command line: a decimal
//! count followed by `B`, `kB` or `MB`. The multipliers are binary, so `4kB`
//! is 4096 bytes and `2MB` is 2097152 bytes.

use std::sync::LazyLock;

use regex::Regex;

use super::error::{SweepError, SweepResult};

/// Grammar for a size string.
#[allow(clippy::unwrap_used)]
static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)(k|M)?B$").unwrap());

/// One kibibyte.
pub const KIB: u64 = 1024;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Returns the multiplier for an optional unit prefix.
fn multiplier(prefix: Option<&str>) -> u64 {
    match prefix {
        Some("k") => KIB,
        Some("M") => MIB,
        _ => 1,
    }
}

/// Parses a size string into a byte count.
///
/// `name` only labels the error; it is the display name of the variable the
/// value belongs to.
///
/// # Examples
///
/// ```
/// use cachesweep_core::common::parse_size;
/// assert_eq!(parse_size("L1", "4kB").unwrap(), 4096);
/// assert_eq!(parse_size("L1", "128B").unwrap(), 128);
/// ```
pub fn parse_size(name: &str, value: &str) -> SweepResult<u64> {
    let invalid = || SweepError::InvalidFormat {
        name: name.to_string(),
        value: value.to_string(),
    };
    let caps = SIZE_PATTERN.captures(value).ok_or_else(invalid)?;
    let count: u64 = caps[1].parse().map_err(|_| invalid())?;
    let unit = multiplier(caps.get(2).map(|m| m.as_str()));
    count.checked_mul(unit).ok_or_else(invalid)
}

/// Fails with [`SweepError::InvalidSize`] unless `bytes` is a positive power of two.
pub fn ensure_power_of_two(name: &str, value: &str, bytes: u64) -> SweepResult<u64> {
    if bytes.is_power_of_two() {
        Ok(bytes)
    } else {
        Err(SweepError::InvalidSize {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parses and validates a size in one step.
pub fn resolve_size(name: &str, value: &str) -> SweepResult<u64> {
    let bytes = parse_size(name, value)?;
    ensure_power_of_two(name, value, bytes)
}

//! # Unit Parsing Tests
//!
//! Size grammar (`<digits>[k|M]B`), the power-of-two rule, and the
//! elapsed-time formatter.

use std::time::Duration;

use proptest::prelude::*;
use rstest::rstest;

use cachesweep_core::SweepError;
use cachesweep_core::common::{ensure_power_of_two, format_duration, parse_size, resolve_size};

#[rstest]
#[case("4kB", 4096)]
#[case("128B", 128)]
#[case("2MB", 2_097_152)]
#[case("1kB", 1024)]
#[case("64kB", 65_536)]
#[case("0B", 0)]
fn test_parse_size_valid(#[case] value: &str, #[case] bytes: u64) {
    assert_eq!(parse_size("DCache Size", value).unwrap(), bytes);
}

#[rstest]
#[case("4KB")]
#[case("4kb")]
#[case("4k")]
#[case("4 kB")]
#[case("kB")]
#[case("4GB")]
#[case("-4kB")]
#[case("")]
fn test_parse_size_rejects_bad_format(#[case] value: &str) {
    let err = parse_size("DCache Size", value).unwrap_err();
    assert!(matches!(err, SweepError::InvalidFormat { .. }), "{value}: {err}");
}

#[test]
fn test_parse_size_overflow_is_format_error() {
    let err = parse_size("ICache Size", "99999999999999999999MB").unwrap_err();
    assert!(matches!(err, SweepError::InvalidFormat { .. }));
}

#[rstest]
#[case("100B")]
#[case("3kB")]
#[case("0B")]
fn test_resolve_size_rejects_non_power_of_two(#[case] value: &str) {
    let err = resolve_size("ICache Size", value).unwrap_err();
    match err {
        SweepError::InvalidSize { name, value: rejected } => {
            assert_eq!(name, "ICache Size");
            assert_eq!(rejected, value);
        }
        other => panic!("expected InvalidSize, got {other:?}"),
    }
}

#[test]
fn test_invalid_size_message_names_variable() {
    let err = resolve_size("ICache Size", "100B").unwrap_err();
    assert_eq!(err.to_string(), "ICache Size '100B' is not a power of 2");
    assert!(err.is_validation());
}

#[test]
fn test_ensure_power_of_two_passes_value_through() {
    assert_eq!(ensure_power_of_two("x", "8kB", 8192).unwrap(), 8192);
}

#[test]
fn test_format_duration_units() {
    assert_eq!(format_duration(Duration::from_millis(250)), "250.0ms");
    assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
    assert_eq!(format_duration(Duration::from_secs(120)), "2m");
    assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
    assert_eq!(format_duration(Duration::from_secs(7500)), "2h 5m");
}

proptest! {
    #[test]
    fn prop_size_is_digits_times_multiplier(n in 0u64..1_000_000, suffix in prop::sample::select(vec!["", "k", "M"])) {
        let multiplier = match suffix {
            "k" => 1024,
            "M" => 1024 * 1024,
            _ => 1,
        };
        let value = format!("{n}{suffix}B");
        prop_assert_eq!(parse_size("x", &value).unwrap(), n * multiplier);
    }

    #[test]
    fn prop_resolve_accepts_only_powers_of_two(exp in 0u32..20) {
        let bytes = 1u64 << exp;
        let value = format!("{bytes}B");
        prop_assert_eq!(resolve_size("x", &value).unwrap(), bytes);
        if bytes > 2 {
            let off = format!("{}B", bytes + 1);
            prop_assert!(resolve_size("x", &off).is_err());
        }
    }
}

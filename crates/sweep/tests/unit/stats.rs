//! # Report Extraction Tests
//!
//! Reads gem5-style `stats.txt` files from disk and checks CPI, miss rate and
//! every failure mode of the scanner.

use std::path::Path;

use cachesweep_core::SweepError;
use cachesweep_core::stats::{DCACHE_MISS_RATE_KEY, NUM_CYCLES_KEY, SIM_INSTS_KEY, Statistic};

use crate::common::harness::{Workspace, stats_report, write_file};

fn report(ws: &Workspace, contents: &str) -> std::path::PathBuf {
    write_file(&ws.path().join("m5out").join("stats.txt"), contents)
}

#[test]
fn test_cpi_from_full_report() {
    let ws = Workspace::new();
    let path = report(&ws, &stats_report(1000, 4000, 0.125));
    let cpi = Statistic::Cpi.extract(&path).unwrap();
    assert!((cpi - 4.0).abs() < f64::EPSILON);
}

#[test]
fn test_miss_rate_from_full_report() {
    let ws = Workspace::new();
    let path = report(&ws, &stats_report(1000, 4000, 0.125));
    let rate = Statistic::OverallDcacheMissRate.extract(&path).unwrap();
    assert!((rate - 0.125).abs() < f64::EPSILON);
}

#[test]
fn test_extraction_is_idempotent() {
    let ws = Workspace::new();
    let path = report(&ws, &stats_report(3, 10, 0.5));
    let first = Statistic::Cpi.extract(&path).unwrap();
    let second = Statistic::Cpi.extract(&path).unwrap();
    assert!((first - second).abs() < f64::EPSILON);
}

#[test]
fn test_instructions_without_cycles() {
    let ws = Workspace::new();
    let path = report(&ws, &format!("{SIM_INSTS_KEY} 1000\n"));
    let err = Statistic::Cpi.extract(&path).unwrap_err();
    assert!(matches!(err, SweepError::StatisticNotFound { what: "cycle count", .. }));
}

#[test]
fn test_cycles_without_instructions() {
    let ws = Workspace::new();
    let path = report(&ws, &format!("{NUM_CYCLES_KEY} 4000\n"));
    let err = Statistic::Cpi.extract(&path).unwrap_err();
    assert!(matches!(err, SweepError::StatisticNotFound { what: "instruction count", .. }));
}

#[test]
fn test_zero_byte_report_is_empty() {
    let ws = Workspace::new();
    let path = report(&ws, "");
    let err = Statistic::OverallDcacheMissRate.extract(&path).unwrap_err();
    assert!(matches!(err, SweepError::EmptyReport { .. }));
    assert!(err.to_string().contains("--verbose"));
}

#[test]
fn test_zero_instructions() {
    let ws = Workspace::new();
    let path = report(&ws, &stats_report(0, 4000, 0.0));
    let err = Statistic::Cpi.extract(&path).unwrap_err();
    assert!(matches!(err, SweepError::DivisionByZero { .. }));
}

#[test]
fn test_missing_report_is_io_error() {
    let ws = Workspace::new();
    let err = Statistic::Cpi.extract(&ws.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, SweepError::Io { .. }));
}

#[test]
fn test_miss_rate_total_line_is_not_used() {
    let contents = "system.cpu.dcache.overallMissRate::total 0.9\n";
    let err = Statistic::OverallDcacheMissRate
        .extract_from(contents.as_bytes(), Path::new("stats.txt"))
        .unwrap_err();
    assert!(matches!(err, SweepError::StatisticNotFound { .. }));
}

#[test]
fn test_non_numeric_value_is_malformed() {
    let contents = format!("{DCACHE_MISS_RATE_KEY} nan%\n");
    let err = Statistic::OverallDcacheMissRate
        .extract_from(contents.as_bytes(), Path::new("stats.txt"))
        .unwrap_err();
    assert!(matches!(err, SweepError::MalformedStatistic { key: DCACHE_MISS_RATE_KEY, .. }));
}

#[test]
fn test_statistic_labels() {
    assert_eq!(Statistic::Cpi.to_string(), "Cycles Per Instruction");
    assert_eq!(Statistic::OverallDcacheMissRate.label(), "Overall DCache Miss Rate");
}

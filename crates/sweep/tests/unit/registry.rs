//! # Registry Tests
//!
//! Name lookup for architectures and benchmarks, and per-architecture binary
//! resolution.

use std::path::{Path, PathBuf};

use rstest::rstest;

use cachesweep_core::SweepError;
use cachesweep_core::sim::{Architecture, Benchmark, BenchmarkSize};

#[rstest]
#[case("X86", Architecture::X86)]
#[case("x86", Architecture::X86)]
#[case("ARM", Architecture::Arm)]
#[case("arm", Architecture::Arm)]
fn test_architecture_from_str(#[case] name: &str, #[case] expected: Architecture) {
    assert_eq!(name.parse::<Architecture>().unwrap(), expected);
}

#[test]
fn test_unknown_architecture() {
    let err = "RISCV".parse::<Architecture>().unwrap_err();
    assert!(matches!(err, SweepError::InvalidArchitecture(ref name) if name == "RISCV"));
    assert!(err.is_validation());
}

#[test]
fn test_unknown_benchmark() {
    let err = "qsort".parse::<Benchmark>().unwrap_err();
    assert!(matches!(err, SweepError::InvalidBenchmark(ref name) if name == "qsort"));
}

#[test]
fn test_display_matches_table_spelling() {
    assert_eq!(Architecture::X86.to_string(), "X86");
    assert_eq!(Architecture::Arm.to_string(), "ARM");
    assert_eq!(Benchmark::Crc.to_string(), "crc");
    assert_eq!(Benchmark::Susan.to_string(), "susan");
}

#[test]
fn test_crc_single_argument() {
    let d = Benchmark::Crc.describe(Path::new("bench"), Architecture::X86, BenchmarkSize::Large);
    assert_eq!(d.benchmark, Benchmark::Crc);
    assert_eq!(d.binary, PathBuf::from("bench/CRC32/crc"));
    assert_eq!(d.arguments, vec!["bench/adpcm/data/large.pcm".to_string()]);
}

#[test]
fn test_susan_arm_binary() {
    let d = Benchmark::Susan.describe(Path::new("bench"), Architecture::Arm, BenchmarkSize::Small);
    assert_eq!(d.binary, PathBuf::from("bench/susan/susan.arm"));
    assert_eq!(d.arguments.len(), 3);
    assert!(d.arguments.iter().all(|a| a.starts_with("bench/susan/input_small.pgm ")));
}

#[test]
fn test_dummy_runs_once_without_arguments() {
    let d = Benchmark::Dummy.describe(Path::new("bench"), Architecture::X86, BenchmarkSize::Small);
    assert_eq!(d.arguments, vec![String::new()]);
}

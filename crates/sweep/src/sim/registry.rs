//! Architecture and benchmark registry.
//!
//! The simulator is built once per guest ISA, and every benchmark is built
//! once per ISA too. This module maps the names accepted on the command line
//! to those builds. It provides:
//! 1. **Architectures:** `X86` and `ARM`; ARM binaries carry a `.arm` suffix.
//! 2. **Benchmarks:** `crc`, `susan` and the `dummy` smoke-test program.
//! 3. **Descriptors:** The binary path and argument strings of one benchmark.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::SweepError;

/// Guest instruction set the simulator was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Architecture {
    /// x86-64 guest.
    X86,
    /// ARM guest.
    Arm,
}

impl Architecture {
    /// Every supported architecture, in the default sweep order.
    pub const ALL: [Self; 2] = [Self::X86, Self::Arm];

    /// Upper-case tag used in build paths and result tables.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::X86 => "X86",
            Self::Arm => "ARM",
        }
    }

    /// Suffix appended to benchmark binaries built for this architecture.
    pub const fn binary_suffix(self) -> &'static str {
        match self {
            Self::X86 => "",
            Self::Arm => ".arm",
        }
    }
}

impl FromStr for Architecture {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "X86" => Ok(Self::X86),
            "ARM" => Ok(Self::Arm),
            _ => Err(SweepError::InvalidArchitecture(s.to_string())),
        }
    }
}

impl TryFrom<String> for Architecture {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Input data set size for the benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkSize {
    /// The `small` MiBench inputs.
    #[default]
    Small,
    /// The `large` MiBench inputs.
    Large,
}

impl BenchmarkSize {
    /// Name used in input file paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for BenchmarkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered benchmark program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Benchmark {
    /// CRC32 over an ADPCM sample file.
    Crc,
    /// SUSAN image processing, run in smoothing, edge and corner modes.
    Susan,
    /// Trivial program used to check the toolchain without a real workload.
    Dummy,
}

/// SUSAN modes: output file infix and command-line switch.
const SUSAN_MODES: [(&str, &str); 3] = [("smoothing", "-s"), ("edges", "-e"), ("corners", "-c")];

impl Benchmark {
    /// Lower-case name used in result tables.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crc => "crc",
            Self::Susan => "susan",
            Self::Dummy => "dummy",
        }
    }

    /// Resolves the binary and argument strings for one architecture.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory holding the benchmark builds and inputs.
    /// * `architecture` - Selects the binary build.
    /// * `size` - Selects the input data set.
    pub fn describe(
        self,
        root: &Path,
        architecture: Architecture,
        size: BenchmarkSize,
    ) -> BenchmarkDescriptor {
        let (binary, arguments) = match self {
            Self::Crc => (
                root.join("CRC32").join("crc"),
                vec![root.join("adpcm").join("data").join(format!("{size}.pcm")).display().to_string()],
            ),
            Self::Susan => {
                let dir = root.join("susan");
                let input = dir.join(format!("input_{size}.pgm"));
                let arguments = SUSAN_MODES
                    .iter()
                    .map(|(mode, switch)| {
                        let output = dir.join(format!("output_{size}.{mode}.pgm"));
                        format!("{} {} {switch}", input.display(), output.display())
                    })
                    .collect();
                (dir.join("susan"), arguments)
            }
            Self::Dummy => (root.join("dummy").join("dummy"), vec![String::new()]),
        };

        let mut binary = binary.into_os_string();
        binary.push(architecture.binary_suffix());
        BenchmarkDescriptor {
            benchmark: self,
            binary: PathBuf::from(binary),
            arguments,
        }
    }
}

impl FromStr for Benchmark {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crc" => Ok(Self::Crc),
            "susan" => Ok(Self::Susan),
            "dummy" => Ok(Self::Dummy),
            _ => Err(SweepError::InvalidBenchmark(s.to_string())),
        }
    }
}

impl TryFrom<String> for Benchmark {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A benchmark resolved for one architecture and input size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkDescriptor {
    /// Which benchmark this describes.
    pub benchmark: Benchmark,
    /// Path of the guest binary passed to the simulator with `--cmd`.
    pub binary: PathBuf,
    /// One simulator run is made per entry, passed with `--options`.
    pub arguments: Vec<String>,
}

//! Resolved configuration variables.
//!
//! A [`ConfigVariable`] is one axis pinned to one value for one grid cell. It
//! is built fresh per cell, validated once, and dropped after the cell's row is
//! written.

use crate::common::error::{SweepError, SweepResult};
use crate::common::units::resolve_size;
use crate::config::{UnitKind, VariableAxis};

/// One swept parameter fixed to a single, validated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVariable {
    /// Display name, e.g. `DCache Size`.
    pub name: String,
    /// Simulator flag without dashes.
    pub flag: String,
    /// Value exactly as given, e.g. `4kB`; this is what the simulator receives.
    pub value: String,
    /// Value as an integer (bytes for byte-size axes); this is what the table receives.
    pub resolved: u64,
}

impl ConfigVariable {
    /// Validates `value` against the axis' unit kind and pins it.
    ///
    /// Byte sizes must match the size grammar and be a power of two; unitless
    /// values must be positive integers.
    pub fn resolve(axis: &VariableAxis, value: &str) -> SweepResult<Self> {
        let resolved = match axis.unit {
            UnitKind::Bytes => resolve_size(&axis.name, value)?,
            UnitKind::Unitless => {
                let number: u64 = value.parse().map_err(|_| SweepError::InvalidFormat {
                    name: axis.name.clone(),
                    value: value.to_string(),
                })?;
                if number == 0 {
                    return Err(SweepError::InvalidSize {
                        name: axis.name.clone(),
                        value: value.to_string(),
                    });
                }
                number
            }
        };
        Ok(Self {
            name: axis.name.clone(),
            flag: axis.flag.clone(),
            value: value.to_string(),
            resolved,
        })
    }

    /// Simulator argument, e.g. `--l1d_size=4kB`.
    pub fn flag_token(&self) -> String {
        format!("--{}={}", self.flag, self.value)
    }
}

/// Resolves one value per axis, stopping at the first invalid one.
pub fn resolve_all(axes: &[VariableAxis], values: &[&str]) -> SweepResult<Vec<ConfigVariable>> {
    axes.iter()
        .zip(values)
        .map(|(axis, value)| ConfigVariable::resolve(axis, value))
        .collect()
}

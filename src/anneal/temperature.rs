//! Cooling schedules.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Maps search progress to a temperature in `[0, 1]`.
///
/// Must be non-increasing in `step` for a fixed `total_steps`.
pub trait TemperatureFunction: Send + Sync {
    fn temperature(&self, step: usize, total_steps: usize) -> f64;
}

/// Selector tags for the built-in cooling schedules.
///
/// # References
///
/// - Linear: fixed-duration cooling
/// - Quadratic: linear squared, spends more of the run cold
/// - Flat: fixed-probability hill climbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TemperatureKind {
    /// `(total - 1 - step) / total`.
    #[default]
    Linear,

    /// Square of the linear value. Cools faster near the end.
    Quadratic,

    /// Constant 0.5.
    Flat,
}

impl TemperatureKind {
    pub const ALL: [TemperatureKind; 3] = [
        TemperatureKind::Linear,
        TemperatureKind::Quadratic,
        TemperatureKind::Flat,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            TemperatureKind::Linear => "LINEAR",
            TemperatureKind::Quadratic => "QUADRATIC",
            TemperatureKind::Flat => "FLAT",
        }
    }
}

fn linear(step: usize, total_steps: usize) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    let remaining = total_steps as f64 - 1.0 - step as f64;
    (remaining / total_steps as f64).clamp(0.0, 1.0)
}

impl TemperatureFunction for TemperatureKind {
    fn temperature(&self, step: usize, total_steps: usize) -> f64 {
        match self {
            TemperatureKind::Linear => linear(step, total_steps),
            TemperatureKind::Quadratic => {
                let t = linear(step, total_steps);
                t * t
            }
            TemperatureKind::Flat => 0.5,
        }
    }
}

impl fmt::Display for TemperatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TemperatureKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "temperature function",
                tag: s.to_string(),
            })
    }
}

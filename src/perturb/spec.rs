//! Declarative perturbation strategies.

use super::composite::{SequencePerturber, WeightedPerturber};
use super::moves::{InsertPerturber, RelocatePerturber, RemovePerturber, SwapPerturber};
use super::types::Perturber;
use crate::error::ConfigError;

/// Default retry budget for the validating moves.
pub const DEFAULT_ATTEMPTS: usize = 16;

/// A perturbation strategy and its parameters, as a configuration value.
///
/// # Examples
///
/// ```
/// use u_timetable::perturb::PerturberSpec;
///
/// let spec = PerturberSpec::weighted(vec![
///     (PerturberSpec::Insert { attempts: 32 }, 3.0),
///     (PerturberSpec::Remove, 1.0),
/// ]);
/// assert!(spec.validate().is_ok());
/// let perturber = spec.build();
/// assert_eq!(perturber.name(), "Weighted");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PerturberSpec {
    /// Place an unscheduled section.
    Insert { attempts: usize },

    /// Move a placed section.
    Relocate { attempts: usize },

    /// Exchange the slots of two placed sections.
    Swap { attempts: usize },

    /// Drop a placed section.
    Remove,

    /// Apply every strategy in order.
    Sequence(Vec<PerturberSpec>),

    /// Pick one strategy per step, proportionally to its weight.
    Weighted(Vec<WeightedStrategy>),
}

/// One entry of [`PerturberSpec::Weighted`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedStrategy {
    pub perturber: PerturberSpec,
    pub weight: f64,
}

impl Default for PerturberSpec {
    fn default() -> Self {
        PerturberSpec::weighted(vec![
            (
                PerturberSpec::Insert {
                    attempts: DEFAULT_ATTEMPTS,
                },
                4.0,
            ),
            (
                PerturberSpec::Relocate {
                    attempts: DEFAULT_ATTEMPTS,
                },
                2.0,
            ),
            (
                PerturberSpec::Swap {
                    attempts: DEFAULT_ATTEMPTS,
                },
                1.0,
            ),
            (PerturberSpec::Remove, 1.0),
        ])
    }
}

impl PerturberSpec {
    /// Shorthand for a weighted mix.
    pub fn weighted(entries: Vec<(PerturberSpec, f64)>) -> Self {
        PerturberSpec::Weighted(
            entries
                .into_iter()
                .map(|(perturber, weight)| WeightedStrategy { perturber, weight })
                .collect(),
        )
    }

    /// Validates the strategy tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PerturberSpec::Insert { attempts }
            | PerturberSpec::Relocate { attempts }
            | PerturberSpec::Swap { attempts } => {
                if *attempts == 0 {
                    return Err(ConfigError::NotPositive {
                        field: "perturber.attempts",
                    });
                }
            }
            PerturberSpec::Remove => {}
            PerturberSpec::Sequence(steps) => {
                if steps.is_empty() {
                    return Err(ConfigError::EmptyStrategy("sequence"));
                }
                for step in steps {
                    step.validate()?;
                }
            }
            PerturberSpec::Weighted(entries) => {
                if entries.is_empty() {
                    return Err(ConfigError::EmptyStrategy("weighted"));
                }
                for entry in entries {
                    if !entry.weight.is_finite() || entry.weight < 0.0 {
                        return Err(ConfigError::InvalidWeight {
                            field: "perturber.weight",
                            value: entry.weight,
                        });
                    }
                    entry.perturber.validate()?;
                }
                if entries.iter().all(|e| e.weight == 0.0) {
                    return Err(ConfigError::NotPositive {
                        field: "perturber.total_weight",
                    });
                }
            }
        }
        Ok(())
    }

    /// Instantiates the strategy tree. Call [`validate`](Self::validate)
    /// first; an unvalidated zero budget simply never moves.
    pub fn build(&self) -> Box<dyn Perturber> {
        match self {
            PerturberSpec::Insert { attempts } => Box::new(InsertPerturber {
                attempts: *attempts,
            }),
            PerturberSpec::Relocate { attempts } => Box::new(RelocatePerturber {
                attempts: *attempts,
            }),
            PerturberSpec::Swap { attempts } => Box::new(SwapPerturber {
                attempts: *attempts,
            }),
            PerturberSpec::Remove => Box::new(RemovePerturber),
            PerturberSpec::Sequence(steps) => Box::new(SequencePerturber::new(
                steps.iter().map(PerturberSpec::build).collect(),
            )),
            PerturberSpec::Weighted(entries) => Box::new(WeightedPerturber::new(
                entries
                    .iter()
                    .map(|e| (e.perturber.build(), e.weight))
                    .collect(),
            )),
        }
    }
}

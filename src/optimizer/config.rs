//! Optimizer configuration.

use crate::anneal::{AcceptanceKind, TemperatureKind};
use crate::error::ConfigError;
use crate::logic::RuleKind;
use crate::perturb::PerturberSpec;
use crate::score::ScorerWeights;

/// Everything fixed for one optimization run.
///
/// The search runs `iterations` outer rounds. Each round starts
/// `sub_optimizers` annealing trajectories of `sub_optimizer_steps` steps
/// from the current schedule, cooled by `sub_temperature`. The round's
/// best trajectory result replaces the current schedule subject to
/// `acceptance` at the `primary_temperature` of the round.
///
/// # Examples
///
/// ```
/// use u_timetable::anneal::TemperatureKind;
/// use u_timetable::optimizer::OptimizerSpec;
///
/// let spec = OptimizerSpec::default()
///     .with_iterations(50)
///     .with_sub_optimizers(8)
///     .with_sub_optimizer_steps(500)
///     .with_sub_temperature(TemperatureKind::Quadratic)
///     .with_seed(42);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerSpec {
    /// Outer rounds. Zero is a valid no-op run.
    pub iterations: usize,

    /// Parallel trajectories per round.
    pub sub_optimizers: usize,

    /// Steps per trajectory. Zero is a valid no-op run.
    pub sub_optimizer_steps: usize,

    /// Cooling across rounds; gates the outer transition.
    pub primary_temperature: TemperatureKind,

    /// Cooling within each trajectory.
    pub sub_temperature: TemperatureKind,

    /// Acceptance criterion for both levels.
    pub acceptance: AcceptanceKind,

    /// Perturbation strategy.
    pub perturber: PerturberSpec,

    /// Score component weights.
    pub scorer: ScorerWeights,

    /// Placement rules, checked in order.
    pub rules: Vec<RuleKind>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Worker pool size. Defaults to `sub_optimizers`.
    pub threads: Option<usize>,
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self {
            iterations: 1000,
            sub_optimizers: 4,
            sub_optimizer_steps: 100,
            primary_temperature: TemperatureKind::Linear,
            sub_temperature: TemperatureKind::Linear,
            acceptance: AcceptanceKind::StandardExponential,
            perturber: PerturberSpec::default(),
            scorer: ScorerWeights::default(),
            rules: RuleKind::ALL.to_vec(),
            seed: None,
            threads: None,
        }
    }
}

impl OptimizerSpec {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_sub_optimizers(mut self, n: usize) -> Self {
        self.sub_optimizers = n;
        self
    }

    pub fn with_sub_optimizer_steps(mut self, n: usize) -> Self {
        self.sub_optimizer_steps = n;
        self
    }

    pub fn with_primary_temperature(mut self, kind: TemperatureKind) -> Self {
        self.primary_temperature = kind;
        self
    }

    pub fn with_sub_temperature(mut self, kind: TemperatureKind) -> Self {
        self.sub_temperature = kind;
        self
    }

    pub fn with_acceptance(mut self, kind: AcceptanceKind) -> Self {
        self.acceptance = kind;
        self
    }

    pub fn with_perturber(mut self, perturber: PerturberSpec) -> Self {
        self.perturber = perturber;
        self
    }

    pub fn with_scorer(mut self, weights: ScorerWeights) -> Self {
        self.scorer = weights;
        self
    }

    pub fn with_rules(mut self, rules: Vec<RuleKind>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sub_optimizers == 0 {
            return Err(ConfigError::NotPositive {
                field: "sub_optimizers",
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::NotPositive { field: "threads" });
        }
        self.scorer.validate()?;
        self.perturber.validate()?;
        Ok(())
    }
}

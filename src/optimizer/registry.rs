//! Selector-to-strategy registry.
//!
//! Configuration names strategies by tag. The registry maps each tag to a
//! factory, and [`StrategyRegistry::resolve`] turns an [`OptimizerSpec`]
//! into concrete components once, before any round starts.

use super::config::OptimizerSpec;
use crate::anneal::{AcceptanceFunction, AcceptanceKind, TemperatureFunction, TemperatureKind};
use crate::error::ConfigError;
use crate::logic::{RuleKind, RuleSet, ScheduleRule};
use crate::perturb::Perturber;
use crate::score::{CompleteScorer, Scorer};
use std::collections::HashMap;
use std::sync::Arc;

type TemperatureFactory = Box<dyn Fn() -> Arc<dyn TemperatureFunction> + Send + Sync>;
type AcceptanceFactory = Box<dyn Fn() -> Arc<dyn AcceptanceFunction> + Send + Sync>;
type RuleFactory = Box<dyn Fn() -> Arc<dyn ScheduleRule> + Send + Sync>;

/// Factories for every selectable strategy.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::anneal::{TemperatureFunction, TemperatureKind};
/// use u_timetable::optimizer::{OptimizerSpec, StrategyRegistry};
///
/// // Swap in a gentler FLAT schedule.
/// struct Lukewarm;
/// impl TemperatureFunction for Lukewarm {
///     fn temperature(&self, _: usize, _: usize) -> f64 { 0.2 }
/// }
///
/// let registry = StrategyRegistry::standard()
///     .with_temperature(TemperatureKind::Flat, || Arc::new(Lukewarm));
/// let spec = OptimizerSpec::default().with_sub_temperature(TemperatureKind::Flat);
/// let resolved = registry.resolve(&spec).unwrap();
/// assert_eq!(resolved.sub_temperature.temperature(0, 10), 0.2);
/// ```
#[derive(Default)]
pub struct StrategyRegistry {
    temperatures: HashMap<TemperatureKind, TemperatureFactory>,
    acceptances: HashMap<AcceptanceKind, AcceptanceFactory>,
    rules: HashMap<RuleKind, RuleFactory>,
}

impl StrategyRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with every built-in strategy.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for kind in TemperatureKind::ALL {
            registry = registry.with_temperature(kind, move || Arc::new(kind));
        }
        for kind in AcceptanceKind::ALL {
            registry = registry.with_acceptance(kind, move || Arc::new(kind));
        }
        for kind in RuleKind::ALL {
            registry = registry.with_rule(kind, move || kind.build());
        }
        registry
    }

    pub fn with_temperature<F>(mut self, kind: TemperatureKind, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn TemperatureFunction> + Send + Sync + 'static,
    {
        self.temperatures.insert(kind, Box::new(factory));
        self
    }

    pub fn with_acceptance<F>(mut self, kind: AcceptanceKind, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn AcceptanceFunction> + Send + Sync + 'static,
    {
        self.acceptances.insert(kind, Box::new(factory));
        self
    }

    pub fn with_rule<F>(mut self, kind: RuleKind, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn ScheduleRule> + Send + Sync + 'static,
    {
        self.rules.insert(kind, Box::new(factory));
        self
    }

    fn temperature(&self, kind: TemperatureKind) -> Result<Arc<dyn TemperatureFunction>, ConfigError> {
        self.temperatures
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "temperature function",
                tag: kind.to_string(),
            })
    }

    fn acceptance(&self, kind: AcceptanceKind) -> Result<Arc<dyn AcceptanceFunction>, ConfigError> {
        self.acceptances
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "acceptance function",
                tag: kind.to_string(),
            })
    }

    fn rule(&self, kind: RuleKind) -> Result<Arc<dyn ScheduleRule>, ConfigError> {
        self.rules
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "rule",
                tag: kind.to_string(),
            })
    }

    /// Validates `spec` and instantiates its strategies.
    pub fn resolve(&self, spec: &OptimizerSpec) -> Result<ResolvedOptimizer, ConfigError> {
        spec.validate()?;

        let mut rules = RuleSet::new();
        for &kind in &spec.rules {
            rules = rules.with_shared_rule(self.rule(kind)?);
        }

        Ok(ResolvedOptimizer {
            iterations: spec.iterations,
            sub_optimizers: spec.sub_optimizers,
            sub_optimizer_steps: spec.sub_optimizer_steps,
            primary_temperature: self.temperature(spec.primary_temperature)?,
            sub_temperature: self.temperature(spec.sub_temperature)?,
            acceptance: self.acceptance(spec.acceptance)?,
            perturber: Arc::from(spec.perturber.build()),
            scorer: Arc::new(CompleteScorer::new(spec.scorer)),
            rules,
            seed: spec.seed.unwrap_or_else(rand::random),
            threads: spec.threads.unwrap_or(spec.sub_optimizers),
        })
    }
}

/// An optimizer configuration with every strategy instantiated.
///
/// Immutable for the duration of a run and shared by all trajectories.
#[derive(Clone)]
pub struct ResolvedOptimizer {
    pub iterations: usize,
    pub sub_optimizers: usize,
    pub sub_optimizer_steps: usize,
    pub primary_temperature: Arc<dyn TemperatureFunction>,
    pub sub_temperature: Arc<dyn TemperatureFunction>,
    pub acceptance: Arc<dyn AcceptanceFunction>,
    pub perturber: Arc<dyn Perturber>,
    pub scorer: Arc<dyn Scorer>,
    pub rules: RuleSet,
    pub seed: u64,
    pub threads: usize,
}

impl ResolvedOptimizer {
    /// Replaces the scorer built from the configured weights.
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replaces the configured perturber.
    pub fn with_perturber(mut self, perturber: Arc<dyn Perturber>) -> Self {
        self.perturber = perturber;
        self
    }

    /// Replaces the rule set built from the configured selectors.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

impl std::fmt::Debug for ResolvedOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedOptimizer")
            .field("iterations", &self.iterations)
            .field("sub_optimizers", &self.sub_optimizers)
            .field("sub_optimizer_steps", &self.sub_optimizer_steps)
            .field("perturber", &self.perturber.name())
            .field("scorer", &self.scorer.name())
            .field("rules", &self.rules)
            .field("seed", &self.seed)
            .field("threads", &self.threads)
            .finish()
    }
}

//! Perturbers built from other perturbers.

use super::types::Perturber;
use crate::logic::RuleSet;
use crate::schedule::Schedule;
use rand::{Rng, RngCore};

/// Applies each inner perturber in turn to the running result.
pub struct SequencePerturber {
    steps: Vec<Box<dyn Perturber>>,
}

impl SequencePerturber {
    pub fn new(steps: Vec<Box<dyn Perturber>>) -> Self {
        Self { steps }
    }
}

impl Perturber for SequencePerturber {
    fn name(&self) -> &str {
        "Sequence"
    }

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        let mut current = schedule.clone();
        for step in &self.steps {
            current = step.perturb(&current, rules, rng);
        }
        current
    }
}

/// Picks one inner perturber per call with probability proportional to its
/// weight.
pub struct WeightedPerturber {
    entries: Vec<(Box<dyn Perturber>, f64)>,
}

impl WeightedPerturber {
    pub fn new(entries: Vec<(Box<dyn Perturber>, f64)>) -> Self {
        Self { entries }
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(p, _)| p.name()).collect()
    }
}

/// Roulette wheel selection on weights.
fn roulette_select(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || weights.is_empty() {
        return 0;
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if roll < w {
            return i;
        }
        roll -= w;
    }
    // Rounding can leave a sliver past the last bucket.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

impl Perturber for WeightedPerturber {
    fn name(&self) -> &str {
        "Weighted"
    }

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        if self.entries.is_empty() {
            return schedule.clone();
        }
        let weights: Vec<f64> = self.entries.iter().map(|(_, w)| *w).collect();
        let chosen = roulette_select(&weights, rng);
        self.entries[chosen].0.perturb(schedule, rules, rng)
    }
}

//! Single-trajectory simulated annealing.

use super::acceptance::AcceptanceFunction;
use super::temperature::TemperatureFunction;
use crate::logic::RuleSet;
use crate::perturb::Perturber;
use crate::schedule::Schedule;
use crate::score::Scorer;
use rand::RngCore;
use tracing::trace;

/// Result of one annealing trajectory.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// The best schedule visited, including the start.
    pub best: Schedule,

    /// Score of the best schedule.
    pub best_score: f64,

    /// Score of the schedule the trajectory ended on.
    pub final_score: f64,

    /// Number of steps run.
    pub steps: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,
}

/// Runs one bounded local search.
///
/// Borrows its strategies, so many annealers can share one resolved
/// configuration across threads.
pub struct Annealer<'a> {
    perturber: &'a dyn Perturber,
    scorer: &'a dyn Scorer,
    temperature: &'a dyn TemperatureFunction,
    acceptance: &'a dyn AcceptanceFunction,
    rules: &'a RuleSet,
}

impl<'a> Annealer<'a> {
    pub fn new(
        perturber: &'a dyn Perturber,
        scorer: &'a dyn Scorer,
        temperature: &'a dyn TemperatureFunction,
        acceptance: &'a dyn AcceptanceFunction,
        rules: &'a RuleSet,
    ) -> Self {
        Self {
            perturber,
            scorer,
            temperature,
            acceptance,
            rules,
        }
    }

    /// Runs `steps` steps from `start`.
    ///
    /// Deterministic for a given `rng` state.
    pub fn run(&self, start: Schedule, steps: usize, rng: &mut dyn RngCore) -> AnnealResult {
        let mut current_score = self.scorer.score(&start);
        let mut best = start.clone();
        let mut best_score = current_score;
        let mut current = start;

        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        for step in 0..steps {
            let candidate = self.perturber.perturb(&current, self.rules, rng);
            let candidate_score = self.scorer.score(&candidate);
            let delta = candidate_score - current_score;
            let temperature = self.temperature.temperature(step, steps);

            if self.acceptance.accept(delta, temperature, rng) {
                if delta > 0.0 {
                    improving_moves += 1;
                }
                current = candidate;
                current_score = candidate_score;
                accepted_moves += 1;

                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                }
            }
        }

        trace!(
            steps,
            accepted_moves,
            improving_moves,
            best_score,
            "trajectory finished"
        );

        AnnealResult {
            best,
            best_score,
            final_score: current_score,
            steps,
            accepted_moves,
            improving_moves,
        }
    }
}
